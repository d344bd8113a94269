//! Clean operation - remove build output.

use std::path::{Path, PathBuf};

use shellpack_core::remove_dir_if_exists;
use shellpack_pipeline::{Error, Result, inspect};

use crate::reports::CleanReport;

/// Execute the clean operation.
///
/// Removes `build/` and, for TypeScript projects, the compiled `dist/`
/// tree. The raw source tree is never touched.
pub fn clean(root: &Path, dry_run: bool) -> Result<CleanReport> {
    let project = inspect(root)?;

    let mut targets = vec![project.build_dir()];
    if project.uses_typed_source {
        targets.push(project.output_dir.clone());
    }

    let mut removed: Vec<PathBuf> = Vec::new();
    for dir in targets.into_iter().filter(|d| d.is_dir()) {
        if !dry_run {
            remove_dir_if_exists(&dir).map_err(|e| Error::io(&dir, e))?;
            tracing::debug!(dir = %dir.display(), "removed");
        }
        removed.push(dir.strip_prefix(&project.root).unwrap_or(&dir).to_path_buf());
    }

    Ok(CleanReport { dry_run, removed })
}
