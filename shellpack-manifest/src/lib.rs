//! Project descriptor parsing for shellpack.
//!
//! A project is identified by two JSON documents at its root: the extension
//! descriptor (`metadata.json`) and the package descriptor (`package.json`).
//! An optional `shellpack.toml` carries build configuration.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;
mod identity;
mod metadata;
mod package;

pub use config::{BuildConfig, CONFIG_FILE, KNOWN_TOOLS, ProjectConfig};
pub use error::{Error, Result, SourceContext};
pub use file::{Document, JsonFile};
pub use identity::{ExtensionIdentity, ProjectFiles};
pub use metadata::{ExtensionMetadata, METADATA_FILE};
pub use package::{PACKAGE_FILE, PackageJson};
