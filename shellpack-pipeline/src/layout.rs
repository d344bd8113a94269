//! Conventional project layout.

use std::path::{Path, PathBuf};

pub(crate) const SOURCE_DIR: &str = "src";
pub(crate) const COMPILED_DIR: &str = "dist";
pub(crate) const BUILD_DIR: &str = "build";
pub(crate) const TRANSLATIONS_DIR: &str = "po";
pub(crate) const RESOURCES_DIR: &str = "data";
pub(crate) const SCHEMAS_DIR: &str = "schemas";
pub(crate) const DEPENDENCIES_DIR: &str = "node_modules";

pub(crate) const TYPECHECK_CONFIG: &str = "tsconfig.json";
pub(crate) const BUNDLER_CONFIG: &str = "esbuild.config.mjs";
pub(crate) const LICENSE_FILE: &str = "LICENSE";

pub(crate) const TRANSLATION_SUFFIX: &str = ".po";
pub(crate) const SCHEMA_SUFFIX: &str = ".gschema.xml";
pub(crate) const TYPED_SOURCE_SUFFIXES: &[&str] = &[".ts", ".mts", ".cts"];

/// What a project contains, probed once per build.
///
/// Every stage resolves output paths through [`ProjectDescriptor::output_dir`]
/// so the typed/untyped decision is made in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub root: PathBuf,
    pub uses_typed_source: bool,
    pub has_translations: bool,
    pub has_resources: bool,
    pub has_schemas: bool,
    /// `dist/` for typed projects, `src/` otherwise.
    pub output_dir: PathBuf,
}

impl ProjectDescriptor {
    pub(crate) fn new(root: PathBuf, uses_typed_source: bool) -> Self {
        let mut project = Self {
            output_dir: root.join(SOURCE_DIR),
            root,
            uses_typed_source: false,
            has_translations: false,
            has_resources: false,
            has_schemas: false,
        };
        project.set_typed_source(uses_typed_source);
        project
    }

    /// Record whether the project is typed; this also picks the output tree.
    pub(crate) fn set_typed_source(&mut self, uses_typed_source: bool) {
        self.uses_typed_source = uses_typed_source;
        self.output_dir = self.root.join(if uses_typed_source {
            COMPILED_DIR
        } else {
            SOURCE_DIR
        });
    }

    /// The type-checker config whose presence marks a typed project.
    pub fn typecheck_config(&self) -> PathBuf {
        self.root.join(TYPECHECK_CONFIG)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// Directory holding the archive and intermediate resource files.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.root.join(TRANSLATIONS_DIR)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }

    /// Schema sources as they are probed, under the raw source tree.
    pub fn schema_sources_dir(&self) -> PathBuf {
        self.source_dir().join(SCHEMAS_DIR)
    }

    /// Schemas inside the compiled-output tree, where they are compiled.
    pub fn output_schemas_dir(&self) -> PathBuf {
        self.output_dir.join(SCHEMAS_DIR)
    }

    pub fn dependencies_dir(&self) -> PathBuf {
        self.root.join(DEPENDENCIES_DIR)
    }

    pub fn bundler_config(&self) -> PathBuf {
        self.root.join(BUNDLER_CONFIG)
    }

    pub fn license_file(&self) -> PathBuf {
        self.root.join(LICENSE_FILE)
    }

    /// Names of the stages this project enables, in pipeline order.
    pub fn enabled_stages(&self) -> Vec<&'static str> {
        [
            ("compile", self.uses_typed_source),
            ("translate", self.has_translations),
            ("resources", self.has_resources),
            ("schemas", self.has_schemas),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}
