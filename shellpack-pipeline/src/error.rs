use std::path::{Path, PathBuf};

use miette::Diagnostic;
use shellpack_core::ToolError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("'{root}' is not an extension project")]
    #[diagnostic(
        code(shellpack::not_a_project),
        help("expected {missing} in the project root")
    )]
    NotAProjectDirectory { root: PathBuf, missing: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(shellpack_manifest::Error),

    #[error("required tool '{tool}' was not found")]
    #[diagnostic(
        code(shellpack::tool_not_found),
        help("install it, or point [tools] in shellpack.toml at an executable")
    )]
    ToolNotFound { tool: String },

    #[error("no TypeScript compiler found (tried: {tried})")]
    #[diagnostic(
        code(shellpack::compiler_not_found),
        help("add typescript to devDependencies, or install tsc globally")
    )]
    CompilerNotFound { tried: String },

    #[error("resource compiler '{tool}' was not found")]
    #[diagnostic(
        code(shellpack::resource_compiler_not_found),
        help("the data/ directory must be compiled; install glib-compile-resources (glib2 development tools)")
    )]
    ResourceCompilerNotFound { tool: String },

    #[error("schema compiler '{tool}' was not found")]
    #[diagnostic(
        code(shellpack::schema_compiler_not_found),
        help("settings schemas must be compiled; install glib-compile-schemas")
    )]
    SchemaCompilerNotFound { tool: String },

    #[error("failed to start '{tool}'")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with status {exit_code}")]
    #[diagnostic(code(shellpack::tool_failed), help("{stderr}"))]
    ToolExecution {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("the shell refused to reload")]
    #[diagnostic(
        code(shellpack::reload_refused),
        help("Eval is only honoured in unsafe mode; log out and back in instead")
    )]
    ReloadRefused { response: String },

    #[error("packaging failed: {message}")]
    #[diagnostic(code(shellpack::packaging_failed))]
    Packaging {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("failed to access '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} stage failed")]
    #[diagnostic(code(shellpack::stage_failed))]
    Stage {
        stage: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an I/O error bound to the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a packaging error without an underlying cause.
    pub fn packaging(message: impl Into<String>) -> Self {
        Error::Packaging {
            message: message.into(),
            source: None,
        }
    }

    /// Name of the stage this error was raised in, if known.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Error::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// The originating error, looking through stage wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Owned variant of [`Error::root_cause`].
    pub fn into_root_cause(self) -> Error {
        match self {
            Error::Stage { source, .. } => source.into_root_cause(),
            other => other,
        }
    }
}

impl From<Box<shellpack_manifest::Error>> for Error {
    fn from(e: Box<shellpack_manifest::Error>) -> Self {
        Error::Manifest(*e)
    }
}

impl From<ToolError> for Error {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::NotFound { tool } => Error::ToolNotFound { tool },
            ToolError::Spawn { tool, source } => Error::ToolSpawn { tool, source },
            ToolError::Failed {
                tool,
                exit_code,
                stderr,
            } => Error::ToolExecution {
                tool,
                exit_code,
                stderr,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_conversion() {
        let err: Error = ToolError::Failed {
            tool: "msgfmt".into(),
            exit_code: 1,
            stderr: "fr.po:3: syntax error".into(),
        }
        .into();

        assert!(matches!(err, Error::ToolExecution { exit_code: 1, .. }));
        assert_eq!(err.to_string(), "'msgfmt' exited with status 1");
    }

    #[test]
    fn test_root_cause_unwraps_stage() {
        let err = Error::Stage {
            stage: "translate".into(),
            source: Box::new(Error::ToolNotFound { tool: "x".into() }),
        };

        assert_eq!(err.stage(), Some("translate"));
        assert!(matches!(err.root_cause(), Error::ToolNotFound { .. }));
        assert_eq!(err.to_string(), "translate stage failed");
    }
}
