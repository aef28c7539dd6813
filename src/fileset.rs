//! In-memory working set of the pipeline: entry key → raw content.
//!
//! Keys carry an explicit tag so write-back never has to guess from the
//! spelling of a path:
//!
//! | Key       | Created by               | Output path under target        |
//! |-----------|--------------------------|---------------------------------|
//! | `Rooted`  | find, add, combine       | key with the root prefix removed |
//! | `Virtual` | combine (outside root)   | key with its leading `/` removed |
//!
//! Mutation is limited to [`FileSet::insert`], [`FileSet::remove`] and key
//! iteration.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::utils::path::clean_path;

// ============================================================================
// EntryKey
// ============================================================================

/// Key of a file-set entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKey {
    /// Absolute path of a real file, normally under the pipeline root.
    Rooted(PathBuf),
    /// Output path with no source file behind it (combine targets).
    Virtual(PathBuf),
}

impl EntryKey {
    /// Key for a path read from disk.
    pub fn rooted(path: impl AsRef<Path>) -> Self {
        Self::Rooted(clean_path(path.as_ref()))
    }

    /// Key for a combine target.
    ///
    /// Absolute targets under `root` behave like real files of the tree;
    /// anything else is a virtual output path.
    pub fn for_target(root: &Path, target: &Path) -> Self {
        let target = clean_path(target);
        if target.is_absolute() && target.starts_with(root) {
            Self::Rooted(target)
        } else {
            Self::Virtual(target)
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        match self {
            Self::Rooted(path) | Self::Virtual(path) => path,
        }
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    /// Key as a string, for pattern matching.
    #[inline]
    pub fn as_str(&self) -> Cow<'_, str> {
        self.path().to_string_lossy()
    }

    /// Whether the key ends with `.<ext>`.
    pub fn has_extension(&self, ext: &str) -> bool {
        let key = self.as_str();
        key.strip_suffix(ext)
            .is_some_and(|rest| rest.ends_with('.'))
    }

    /// Path relative to the build tree, used by write-back.
    ///
    /// `Rooted` keys lose the root prefix. `Rooted` keys outside the root
    /// and `Virtual` keys lose their leading root component instead.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        match self {
            Self::Rooted(path) => match path.strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => strip_root_component(path),
            },
            Self::Virtual(path) => strip_root_component(path),
        }
    }

    /// Directory the entry lives in on disk, for resolving relative links.
    pub fn base_dir(&self, root: &Path) -> PathBuf {
        let on_disk = match self {
            Self::Rooted(path) => path.clone(),
            Self::Virtual(path) => root.join(strip_root_component(path)),
        };
        on_disk
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf())
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

fn strip_root_component(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

// ============================================================================
// FileSet
// ============================================================================

/// Mapping from entry key to raw content.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    entries: FxHashMap<EntryKey, Vec<u8>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous content.
    pub fn insert(&mut self, key: EntryKey, content: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.entries.insert(key, content.into())
    }

    /// Remove an entry, returning its content.
    pub fn remove(&mut self, key: &EntryKey) -> Option<Vec<u8>> {
        self.entries.remove(key)
    }

    /// Iterate keys (unordered).
    pub fn keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.entries.keys()
    }

    /// Iterate entries (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &[u8])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Snapshot of all keys in sorted order.
    pub fn sorted_keys(&self) -> Vec<EntryKey> {
        let mut keys: Vec<_> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[inline]
    pub fn get(&self, key: &EntryKey) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Content decoded as UTF-8 (lossy).
    #[inline]
    pub fn get_text(&self, key: &EntryKey) -> Option<Cow<'_, str>> {
        self.get(key).map(String::from_utf8_lossy)
    }

    /// Look up by path regardless of tag, preferring `Rooted`.
    pub fn get_path(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        let path = clean_path(path.as_ref());
        self.get(&EntryKey::Rooted(path.clone()))
            .or_else(|| self.get(&EntryKey::Virtual(path)))
    }

    #[inline]
    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_single_value() {
        let mut files = FileSet::new();
        let key = EntryKey::rooted("/src/a.css");

        assert!(files.insert(key.clone(), "a").is_none());
        assert_eq!(files.insert(key.clone(), "b"), Some(b"a".to_vec()));
        assert_eq!(files.len(), 1);
        assert_eq!(files.get(&key), Some(&b"b"[..]));
    }

    #[test]
    fn test_remove_and_sorted_keys() {
        let mut files = FileSet::new();
        files.insert(EntryKey::rooted("/src/b.js"), "b");
        files.insert(EntryKey::rooted("/src/a.js"), "a");
        files.insert(EntryKey::Virtual("bundle.css".into()), "c");

        let keys = files.sorted_keys();
        assert_eq!(keys[0], EntryKey::rooted("/src/a.js"));
        assert_eq!(keys[1], EntryKey::rooted("/src/b.js"));
        assert!(keys[2].is_virtual());

        assert_eq!(files.remove(&keys[0]), Some(b"a".to_vec()));
        assert!(!files.contains(&keys[0]));
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_for_target_tags() {
        let root = Path::new("/site/src");
        assert_eq!(
            EntryKey::for_target(root, Path::new("/site/src/all.css")),
            EntryKey::Rooted("/site/src/all.css".into())
        );
        assert_eq!(
            EntryKey::for_target(root, Path::new("/out/bundle.css")),
            EntryKey::Virtual("/out/bundle.css".into())
        );
        assert_eq!(
            EntryKey::for_target(root, Path::new("bundle.css")),
            EntryKey::Virtual("bundle.css".into())
        );
    }

    #[test]
    fn test_output_path_by_tag() {
        let root = Path::new("/site/src");
        assert_eq!(
            EntryKey::rooted("/site/src/css/app.css").output_path(root),
            PathBuf::from("css/app.css")
        );
        assert_eq!(
            EntryKey::rooted("/elsewhere/lib.js").output_path(root),
            PathBuf::from("elsewhere/lib.js")
        );
        assert_eq!(
            EntryKey::Virtual("/out/bundle.css".into()).output_path(root),
            PathBuf::from("out/bundle.css")
        );
        assert_eq!(
            EntryKey::Virtual("bundle.css".into()).output_path(root),
            PathBuf::from("bundle.css")
        );
    }

    #[test]
    fn test_has_extension() {
        let key = EntryKey::rooted("/src/site.min.css");
        assert!(key.has_extension("css"));
        assert!(key.has_extension("min.css"));
        assert!(!key.has_extension("ss"));
        assert!(!EntryKey::rooted("/src/css").has_extension("css"));
    }

    #[test]
    fn test_base_dir() {
        let root = Path::new("/site/src");
        assert_eq!(
            EntryKey::rooted("/site/src/css/app.css").base_dir(root),
            PathBuf::from("/site/src/css")
        );
        assert_eq!(
            EntryKey::Virtual("bundle.css".into()).base_dir(root),
            PathBuf::from("/site/src")
        );
    }

    #[test]
    fn test_get_path_and_text() {
        let mut files = FileSet::new();
        files.insert(EntryKey::Virtual("/out/all.css".into()), "body{}");
        assert_eq!(files.get_path("/out/all.css"), Some(&b"body{}"[..]));
        assert_eq!(
            files
                .get_text(&EntryKey::Virtual("/out/all.css".into()))
                .as_deref(),
            Some("body{}")
        );
        assert!(files.get_path("/out/missing.css").is_none());
    }
}
