//! The package descriptor (`package.json`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shellpack_core::Version;

use crate::{Result, SourceContext, file::Document};

/// File name of the package descriptor.
pub const PACKAGE_FILE: &str = "package.json";

/// Typed view of the parts of `package.json` shellpack reads.
///
/// Everything else (scripts, dependencies, ...) lives in
/// [`PackageJson::extra`] and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// Unknown keys, preserved on write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageJson {
    /// The package version.
    ///
    /// Only `None` for documents that were never validated.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl Document for PackageJson {
    const FILE_NAME: &'static str = PACKAGE_FILE;

    fn validate(&self, ctx: &SourceContext) -> Result<()> {
        if self.version.is_none() {
            return Err(ctx.missing_field_error("version"));
        }
        Ok(())
    }
}
