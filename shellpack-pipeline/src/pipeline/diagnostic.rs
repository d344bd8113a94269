//! Diagnostic types for the build pipeline.
//!
//! Non-fatal findings (a skipped optional stage, a missing bundler config)
//! are collected here instead of aborting the build.

use std::fmt;

/// A warning raised by one stage; the build carried on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The stage that produced this diagnostic.
    pub stage: String,
    pub message: String,
    /// Optional file the message is about, relative to the project root.
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn warning(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Attach the file this diagnostic concerns.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning: {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " ({})", loc)?;
        }
        Ok(())
    }
}
