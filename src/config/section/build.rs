//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! root = "src"                # Source root (relative to kiln.toml)
//! output = "dist"             # Write-back target directory
//! clean = true                # Remove output before writing
//! add = [
//!     "../vendor/jquery.js",                          # → <root>/jquery.js
//!     { path = "../shared/reset.css", target = "src/css" },
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::path::resolve_path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source root directory.
    pub root: Option<PathBuf>,

    /// Write-back target directory.
    pub output: Option<PathBuf>,

    /// Remove the output directory before writing.
    pub clean: bool,

    /// Files added explicitly after discovery.
    pub add: Vec<AddEntry>,
}

impl BuildSectionConfig {
    /// Resolve every relative path against `base` (the config file directory).
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(root) = &mut self.root {
            *root = resolve_path(root, base);
        }
        if let Some(output) = &mut self.output {
            *output = resolve_path(output, base);
        }
        for entry in &mut self.add {
            entry.resolve_paths(base);
        }
    }
}

/// A file added to the build explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddEntry {
    /// Just a path: lands next to itself when under the root, else at the root.
    Simple(PathBuf),
    /// Path plus the logical directory it is placed in.
    Full {
        path: PathBuf,
        target: Option<PathBuf>,
    },
}

impl AddEntry {
    /// Source file on disk.
    pub fn source(&self) -> &Path {
        match self {
            Self::Simple(path) | Self::Full { path, .. } => path,
        }
    }

    /// Explicit target directory, if any.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Simple(_) => None,
            Self::Full { target, .. } => target.as_deref(),
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        match self {
            Self::Simple(path) => *path = resolve_path(path, base),
            Self::Full { path, target } => {
                *path = resolve_path(path, base);
                if let Some(target) = target {
                    *target = resolve_path(target, base);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_entries_parse_both_forms() {
        let config: BuildSectionConfig = toml::from_str(
            r#"
            root = "src"
            add = ["lib/a.js", { path = "lib/b.css", target = "src/css" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.add.len(), 2);
        assert_eq!(config.add[0].source(), Path::new("lib/a.js"));
        assert_eq!(config.add[0].target(), None);
        assert_eq!(config.add[1].target(), Some(Path::new("src/css")));
    }

    #[test]
    fn test_resolve_paths_against_base() {
        let mut config = BuildSectionConfig {
            root: Some("src".into()),
            output: Some("/abs/dist".into()),
            clean: false,
            add: vec![AddEntry::Full {
                path: "../lib/a.js".into(),
                target: Some("src/vendor".into()),
            }],
        };
        config.resolve_paths(Path::new("/site"));

        assert_eq!(config.root, Some(PathBuf::from("/site/src")));
        assert_eq!(config.output, Some(PathBuf::from("/abs/dist")));
        assert_eq!(config.add[0].source(), Path::new("/lib/a.js"));
        assert_eq!(config.add[0].target(), Some(Path::new("/site/src/vendor")));
    }
}
