//! Version operation - record a new release in both descriptors.

use std::{path::Path, str::FromStr};

use shellpack_core::{Bump, Version};
use shellpack_manifest::{ProjectFiles, Result};

use crate::reports::VersionReport;

/// Requested version change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    Bump(Bump),
    Set(Version),
}

impl FromStr for VersionChange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<Bump>()
            .map(VersionChange::Bump)
            .or_else(|_| s.parse::<Version>().map(VersionChange::Set))
            .map_err(|_| format!("expected major, minor, patch or X.Y.Z, got '{}'", s))
    }
}

/// Execute the version operation.
///
/// Writes the new version to `package.json` and `version-name` in
/// `metadata.json`, and advances the integer `version` there.
pub fn version(root: &Path, change: &VersionChange) -> Result<VersionReport> {
    let mut files = ProjectFiles::open(root)?;
    let previous = files.identity().version;

    let next = match change {
        VersionChange::Bump(bump) => files.bump_version(*bump)?,
        VersionChange::Set(version) => {
            files.set_version(version.clone());
            version.clone()
        }
    };
    files.save()?;

    Ok(VersionReport {
        previous: previous.to_string(),
        current: next.to_string(),
        release: files.metadata.value().schema_version.unwrap_or_default(),
    })
}
