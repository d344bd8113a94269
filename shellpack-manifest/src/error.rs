use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for descriptor operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the document content and filename so error factories can attach
/// a [`NamedSource`] and point at the offending key.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Locate a JSON object key (`"key"`) in the source.
    pub fn json_key_span(&self, key: &str) -> Option<SourceSpan> {
        let quoted = format!("\"{}\"", key);
        self.src
            .find(&quoted)
            .map(|pos| SourceSpan::from((pos, quoted.len())))
    }

    /// Locate a TOML key (`key =`) in the source.
    pub fn toml_key_span(&self, key: &str) -> Option<SourceSpan> {
        self.src.lines().scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len() + 1;
            Some((start, line))
        })
        .find_map(|(start, line)| {
            let trimmed = line.trim_start();
            let indent = line.len() - trimmed.len();
            let rest = trimmed.strip_prefix(key)?;
            let rest = rest.trim_start();
            rest.starts_with('=')
                .then(|| SourceSpan::from((start + indent, key.len())))
        })
    }

    /// Create a parse error from a serde_json error.
    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = line_col_offset(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::from((offset, 0)));
        Box::new(Error::ParseJson {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a parse error from a toml error.
    pub fn toml_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::ParseToml {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a missing field error.
    pub fn missing_field_error(&self, field: impl Into<String>) -> Box<Error> {
        Box::new(Error::MissingField {
            src: self.named_source(),
            field: field.into(),
            filename: self.filename.clone(),
        })
    }

    /// Create an invalid extension id error pointing at `key`.
    pub fn invalid_id_error(
        &self,
        key: &str,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Error> {
        Box::new(Error::InvalidId {
            src: self.named_source(),
            span: self.json_key_span(key),
            id: id.into(),
            reason: reason.into(),
        })
    }

    /// Create an unknown tool error pointing at the offending key.
    pub fn unknown_tool_error(&self, name: impl Into<String>) -> Box<Error> {
        let name = name.into();
        Box::new(Error::UnknownTool {
            src: self.named_source(),
            span: self.toml_key_span(&name),
            name,
        })
    }
}

/// Convert a 1-based line/column pair into a byte offset.
fn line_col_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("run shellpack from an extension project root or pass -C <dir>"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{path}'")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse JSON document")]
    #[diagnostic(code(shellpack::parse_error))]
    ParseJson {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse shellpack.toml")]
    #[diagnostic(code(shellpack::parse_error))]
    ParseToml {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{filename}' is missing required field '{field}'")]
    #[diagnostic(code(shellpack::missing_field), help("add a non-empty \"{field}\" entry"))]
    MissingField {
        #[source_code]
        src: NamedSource<String>,
        field: String,
        filename: String,
    },

    #[error("invalid extension id '{id}'")]
    #[diagnostic(
        code(shellpack::invalid_id),
        help("{reason}. Use letters, digits, '.', '_', '-' and '@', e.g. 'my-extension@example.com'")
    )]
    InvalidId {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid id")]
        span: Option<SourceSpan>,
        id: String,
        reason: String,
    },

    #[error("cannot bump version '{version}'")]
    #[diagnostic(code(shellpack::invalid_version), help("{reason}. Set an explicit version instead"))]
    InvalidVersion { version: String, reason: String },

    #[error("unknown tool '{name}'")]
    #[diagnostic(
        code(shellpack::unknown_tool),
        help(
            "known tools are: npm, pnpm, yarn, node, tsc, npx, msgfmt, glib-compile-resources, glib-compile-schemas, zip, gnome-extensions, busctl"
        )
    )]
    UnknownTool {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a tool shellpack invokes")]
        span: Option<SourceSpan>,
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_offset() {
        let src = "{\n  \"a\": 1,\n  \"b\": x\n}";
        assert_eq!(line_col_offset(src, 1, 1), Some(0));
        assert_eq!(line_col_offset(src, 2, 3), Some(4));
        assert_eq!(line_col_offset(src, 3, 8), Some(19));
        assert_eq!(line_col_offset(src, 0, 0), None);
        assert_eq!(line_col_offset(src, 99, 99), Some(src.len()));
    }

    #[test]
    fn test_json_key_span() {
        let ctx = SourceContext::new(r#"{"uuid": "x@y"}"#, "metadata.json");
        let span = ctx.json_key_span("uuid").unwrap();
        assert_eq!(span.offset(), 1);
        assert_eq!(span.len(), 6);
        assert!(ctx.json_key_span("name").is_none());
    }

    #[test]
    fn test_toml_key_span() {
        let ctx = SourceContext::new("[tools]\n  zipper = \"zip\"\n", "shellpack.toml");
        let span = ctx.toml_key_span("zipper").unwrap();
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 6);
    }

    #[test]
    fn test_json_error_has_span() {
        let src = "{\n  \"uuid\": \n}";
        let ctx = SourceContext::new(src, "metadata.json");
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        match *ctx.json_error(err) {
            Error::ParseJson { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
