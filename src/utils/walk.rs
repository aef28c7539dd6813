//! Filesystem helpers: recursive listing, removal and directory creation.

use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::config::Pattern;

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// List files under `root`, sorted by path.
///
/// With `recursive = false` only direct children are listed. When `pattern`
/// is given, only paths matching it are returned.
///
/// A missing or unreadable `root` is an error, as is any entry that cannot
/// be read while walking.
pub fn list_files(root: &Path, pattern: Option<&Pattern>, recursive: bool) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory `{}` not found", root.display()),
        ));
    }

    let mut walker = WalkDir::new(root).skip_hidden(false).sort(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        let path = entry.path();
        // symlinked files count as files; symlinked directories are not entered
        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && path.is_file());
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        if pattern.is_none_or(|p| p.is_match(&path.to_string_lossy())) {
            files.push(path);
        }
    }

    Ok(files)
}

/// Remove a directory tree. A missing path is not an error.
pub fn remove_dir_all(path: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Create a directory and all of its missing parents.
#[inline]
pub fn create_dirs(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}
