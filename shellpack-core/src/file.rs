use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

/// Copy a single file, creating parent directories of the destination as needed.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

/// Remove a directory tree. Returns `true` if something was removed.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove a single file. Returns `true` if something was removed.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check whether `dir` contains at least one regular file accepted by `accept`.
///
/// Only the top level is inspected unless `recursive` is set. A missing or
/// unreadable directory counts as empty.
pub fn dir_contains_file(dir: &Path, recursive: bool, accept: impl Fn(&Path) -> bool) -> bool {
    if !dir.is_dir() {
        return false;
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && accept(entry.path()))
}

/// List every regular file under `dir`, relative to `dir`, sorted by path.
pub fn relative_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| io::Error::other(e.to_string()))?;
        files.push(rel.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Recursively copy every file under `src` into `dst`, preserving relative
/// paths, skipping files for which `skip` returns `true`.
///
/// Returns the relative paths that were copied.
pub fn copy_tree_filtered(
    src: &Path,
    dst: &Path,
    skip: impl Fn(&Path) -> bool,
) -> io::Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for rel in relative_files(src)? {
        if skip(&rel) {
            continue;
        }
        copy_file(&src.join(&rel), &dst.join(&rel))?;
        copied.push(rel);
    }
    Ok(copied)
}
