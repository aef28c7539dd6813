//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `clean_path` - lexical cleanup (`.`, `..`, trailing separators)
//! - `normalize_path` - absolute form, relative paths joined onto cwd
//! - `resolve_path` - resolve relative paths against a base directory
//!
//! None of these touch the filesystem: file-set keys must keep the spelling
//! the caller used, so symlinks are never resolved.

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path.
///
/// Drops `.` segments and trailing separators, folds `..` into the previous
/// normal segment. A leading `..` on a relative path is kept; `..` directly
/// under the filesystem root is dropped.
///
/// # Example
/// ```ignore
/// assert_eq!(clean_path(Path::new("/a/b/../c/./d/")), PathBuf::from("/a/c/d"));
/// ```
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Normalize a file system path to absolute form.
///
/// Absolute paths are only cleaned. Relative paths are joined with the
/// current directory first.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean_path(path)
    } else {
        let joined = std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path));
        clean_path(&joined)
    }
}

/// Resolve a path against a base directory.
///
/// Always returns a cleaned path; absolute inputs ignore `base`.
///
/// # Example
/// ```ignore
/// let resolved = resolve_path(Path::new("vendor"), Path::new("/site"));
/// assert_eq!(resolved, PathBuf::from("/site/vendor"));
/// ```
#[inline]
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        clean_path(path)
    } else {
        clean_path(&base.join(path))
    }
}

/// Get `path` relative to `root`, if it lies under it.
#[inline]
pub fn relative_to_root(path: &Path, root: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

/// Lexical path leading from directory `from` to `to`.
///
/// Both paths are expected to be absolute and clean.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component);
    }
    rel
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_folds_segments() {
        assert_eq!(
            clean_path(Path::new("/a/b/../c/./d/")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("../a/b/..")), PathBuf::from("../a"));
    }

    #[test]
    fn test_normalize_path_absolute() {
        let normalized = normalize_path(Path::new("/absolute/path/file.txt"));
        assert_eq!(normalized, PathBuf::from("/absolute/path/file.txt"));
    }

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("relative/path/file.txt"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path(Path::new("/absolute/path"), Path::new("/base")),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(Path::new("../vendor/lib"), Path::new("/base/src")),
            PathBuf::from("/base/vendor/lib")
        );
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new("/site/src");
        assert_eq!(
            relative_to_root(Path::new("/site/src/css/app.css"), root),
            Some(PathBuf::from("css/app.css"))
        );
        assert_eq!(relative_to_root(Path::new("/elsewhere/a.css"), root), None);
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/site/css"), Path::new("/site/css/parts/img/a.png")),
            PathBuf::from("parts/img/a.png")
        );
        assert_eq!(
            relative_path(Path::new("/site/css/parts"), Path::new("/site/img/a.png")),
            PathBuf::from("../../img/a.png")
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("css/img/logo.png")), "css/img/logo.png");
        assert_eq!(to_slash(Path::new("/abs/file.js")), "abs/file.js");
        assert_eq!(to_slash(Path::new("../img/./a.png")), "../img/a.png");
    }
}
