//! Extension identity assembled from both descriptors.

use std::path::Path;

use shellpack_core::{Bump, Version};

use crate::{Error, ExtensionMetadata, JsonFile, PackageJson, Result};

/// Who is being built: the stable id, display name and release version.
///
/// The id comes from `metadata.json`, the version from `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionIdentity {
    pub id: String,
    pub display_name: String,
    pub version: Version,
}

impl ExtensionIdentity {
    /// Load the identity of the project rooted at `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        ProjectFiles::open(root).map(|files| files.identity())
    }

    /// File name of the distributable archive,
    /// `<id>.shell-extension-v<version>.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}.shell-extension-v{}.zip", self.id, self.version)
    }

    /// File name of the compiled resource bundle, `<id>.gresource`.
    pub fn resource_file_name(&self) -> String {
        format!("{}.gresource", self.id)
    }

    /// File name of a compiled translation catalog, `<id>.mo`.
    pub fn catalog_file_name(&self) -> String {
        format!("{}.mo", self.id)
    }
}

/// Both descriptor files of a project, opened for reading or editing.
pub struct ProjectFiles {
    pub metadata: JsonFile<ExtensionMetadata>,
    pub package: JsonFile<PackageJson>,
}

impl ProjectFiles {
    /// Open and validate `metadata.json` and `package.json` under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        Ok(Self {
            metadata: JsonFile::open_in(root)?,
            package: JsonFile::open_in(root)?,
        })
    }

    /// The identity described by the two files.
    pub fn identity(&self) -> ExtensionIdentity {
        let metadata = self.metadata.value();
        ExtensionIdentity {
            id: metadata.id.clone(),
            display_name: metadata.display_name.clone(),
            version: self.package.value().version().cloned().unwrap_or_default(),
        }
    }

    /// Record a new release: sets the package version and the display
    /// version, and advances the integer release counter.
    pub fn set_version(&mut self, version: Version) {
        let metadata = self.metadata.value_mut();
        metadata.version_name = Some(version.to_string());
        metadata.schema_version = Some(metadata.schema_version.map_or(1, |v| v + 1));
        self.package.value_mut().version = Some(version);
    }

    /// Record the release after the current one at `bump` and return it.
    pub fn bump_version(&mut self, bump: Bump) -> Result<Version> {
        let current = self.identity().version;
        let next = current.bumped(bump).map_err(|reason| {
            Box::new(Error::InvalidVersion {
                version: current.to_string(),
                reason,
            })
        })?;
        self.set_version(next.clone());
        Ok(next)
    }

    /// Write both files back to disk.
    pub fn save(&mut self) -> Result<()> {
        self.package.save()?;
        self.metadata.save()
    }
}
