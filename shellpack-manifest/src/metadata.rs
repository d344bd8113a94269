//! The extension descriptor (`metadata.json`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, SourceContext, file::Document};

/// File name of the extension descriptor.
pub const METADATA_FILE: &str = "metadata.json";

/// Typed view of `metadata.json`.
///
/// Keys follow the shell's own format (`uuid`, `shell-version`, ...). Keys
/// shellpack does not model are kept in [`ExtensionMetadata::extra`] and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    /// Stable unique identifier (`uuid`).
    #[serde(rename = "uuid", default)]
    pub id: String,

    /// Human-readable name (`name`).
    #[serde(rename = "name", default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Integer release counter (`version`).
    #[serde(rename = "version", default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u64>,

    /// Display version (`version-name`).
    #[serde(
        rename = "version-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub version_name: Option<String>,

    /// Host versions the extension declares support for (`shell-version`).
    #[serde(rename = "shell-version", default)]
    pub supported_host_versions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(
        rename = "settings-schema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub settings_schema: Option<String>,

    #[serde(
        rename = "gettext-domain",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub gettext_domain: Option<String>,

    /// Unknown keys, preserved on write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for ExtensionMetadata {
    const FILE_NAME: &'static str = METADATA_FILE;

    fn validate(&self, ctx: &SourceContext) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ctx.missing_field_error("uuid"));
        }
        if let Some(reason) = invalid_id_reason(&self.id) {
            return Err(ctx.invalid_id_error("uuid", &self.id, reason));
        }
        if self.display_name.trim().is_empty() {
            return Err(ctx.missing_field_error("name"));
        }
        Ok(())
    }
}

/// The id ends up in file names and archive member names, so path
/// separators and whitespace are rejected.
fn invalid_id_reason(id: &str) -> Option<&'static str> {
    if id.starts_with('.') {
        return Some("the id must not start with '.'");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'))
    {
        return Some("the id contains characters that are not allowed in file names");
    }
    None
}
