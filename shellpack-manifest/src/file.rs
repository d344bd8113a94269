use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, SourceContext};

/// A JSON descriptor that lives at a fixed name in the project root.
pub trait Document: Serialize + DeserializeOwned {
    /// File name relative to the project root.
    const FILE_NAME: &'static str;

    /// Check invariants serde cannot express (required non-empty fields, ...).
    fn validate(&self, ctx: &SourceContext) -> Result<()>;
}

/// Represents a descriptor file with both raw content and parsed value.
pub struct JsonFile<T> {
    path: PathBuf,
    content: String,
    value: T,
}

impl<T: Document> JsonFile<T> {
    /// Open `<root>/<FILE_NAME>`.
    pub fn open_in(root: impl AsRef<Path>) -> Result<Self> {
        Self::open(root.as_ref().join(T::FILE_NAME))
    }

    /// Open and parse a descriptor file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let value = parse(&content, &path.display().to_string())?;

        Ok(Self {
            path,
            content,
            value,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content as last read or saved.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Get the parsed value for editing. Call [`JsonFile::save`] to persist.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Serialize the current value and write it to disk.
    ///
    /// Output is pretty-printed with two-space indentation and a trailing
    /// newline, which is what npm and most editors produce.
    pub fn save(&mut self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.value).map_err(|e| {
            Box::new(Error::Serialize {
                path: self.path.clone(),
                source: e,
            })
        })?;
        content.push('\n');

        std::fs::write(&self.path, &content).map_err(|e| {
            Box::new(Error::Write {
                path: self.path.clone(),
                source: e,
            })
        })?;
        self.content = content;
        Ok(())
    }
}

/// Parse and validate a descriptor with the given filename for error reporting.
pub(crate) fn parse<T: Document>(content: &str, filename: &str) -> Result<T> {
    let ctx = SourceContext::new(content, filename);
    let value: T = serde_json::from_str(content).map_err(|e| ctx.json_error(e))?;
    value.validate(&ctx)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{ExtensionMetadata, PackageJson};

    #[test]
    fn test_open_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = JsonFile::<PackageJson>::open_in(temp.path()).err().unwrap();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"uuid": "a@b", "name": "A", "shell-version": ["46"], "session-modes": ["user", "unlock-dialog"]}"#,
        )
        .unwrap();

        let mut file = JsonFile::<ExtensionMetadata>::open(&path).unwrap();
        file.value_mut().version_name = Some("2.0.0".into());
        file.save().unwrap();

        let reread = JsonFile::<ExtensionMetadata>::open(&path).unwrap();
        assert_eq!(reread.value().version_name.as_deref(), Some("2.0.0"));
        assert_eq!(
            reread.value().extra["session-modes"],
            serde_json::json!(["user", "unlock-dialog"])
        );
        assert!(reread.content().ends_with("}\n"));
    }
}
