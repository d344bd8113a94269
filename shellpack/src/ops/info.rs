//! Info operation - project information.

use std::path::Path;

use shellpack_manifest::{ProjectConfig, ProjectFiles};
use shellpack_pipeline::{Result, inspect};

use crate::reports::InfoReport;

/// Execute the info operation.
///
/// Inspects the project the same way a build would, without running
/// anything.
pub fn info(root: &Path) -> Result<InfoReport> {
    let project = inspect(root)?;
    let files = ProjectFiles::open(&project.root)?;
    let config = ProjectConfig::load(&project.root)?;
    let identity = files.identity();
    let metadata = files.metadata.value();

    let relative = |path: &Path| {
        path.strip_prefix(&project.root)
            .unwrap_or(path)
            .display()
            .to_string()
    };

    Ok(InfoReport {
        id: identity.id.clone(),
        name: identity.display_name.clone(),
        description: metadata.description.clone(),
        version: identity.version.to_string(),
        shell_versions: metadata.supported_host_versions.clone(),
        root: project.root.clone(),
        output_dir: relative(&project.output_dir),
        archive: relative(&project.build_dir().join(identity.archive_file_name())),
        stages: project.enabled_stages().into_iter().map(String::from).collect(),
        use_esbuild: config.build.use_esbuild,
        tool_overrides: config.tools.into_iter().collect(),
    })
}
