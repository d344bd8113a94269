//! Project feature detection.

use std::path::Path;

use shellpack_core::{dir_contains_file, file_name_ends_with};
use shellpack_manifest::{METADATA_FILE, PACKAGE_FILE};

use crate::{
    Error, Result,
    layout::{ProjectDescriptor, SCHEMA_SUFFIX, TRANSLATION_SUFFIX},
};

/// Probe `root` and describe which stages a build of it needs.
///
/// The identity files must be present; nothing else is required. Probes are
/// pure reads and run concurrently, joined before this returns.
pub fn inspect(root: impl AsRef<Path>) -> Result<ProjectDescriptor> {
    let root = root.as_ref();

    let missing: Vec<&str> = [METADATA_FILE, PACKAGE_FILE]
        .into_iter()
        .filter(|name| !root.join(name).is_file())
        .collect();
    if !missing.is_empty() {
        return Err(Error::NotAProjectDirectory {
            root: root.to_path_buf(),
            missing: missing.join(" and "),
        });
    }

    let root = root.canonicalize().map_err(|e| Error::io(root, e))?;
    let mut project = ProjectDescriptor::new(root, false);

    let probed = &project;
    let ((uses_typed_source, has_translations), (has_resources, has_schemas)) = rayon::join(
        || {
            rayon::join(
                || probed.typecheck_config().is_file(),
                || {
                    dir_contains_file(&probed.translations_dir(), false, |p| {
                        file_name_ends_with(p, &[TRANSLATION_SUFFIX])
                    })
                },
            )
        },
        || {
            rayon::join(
                || dir_contains_file(&probed.resources_dir(), true, |_| true),
                || {
                    dir_contains_file(&probed.schema_sources_dir(), false, |p| {
                        file_name_ends_with(p, &[SCHEMA_SUFFIX])
                    })
                },
            )
        },
    );

    project.set_typed_source(uses_typed_source);
    project.has_translations = has_translations;
    project.has_resources = has_resources;
    project.has_schemas = has_schemas;

    tracing::debug!(
        root = %project.root.display(),
        typed = project.uses_typed_source,
        translations = project.has_translations,
        resources = project.has_resources,
        schemas = project.has_schemas,
        "inspected project"
    );

    Ok(project)
}
