//! `[find]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [find]
//! pattern = '\.(js|css|html)$'    # Inclusion regex (default: any extension)
//! filter = '\.test\.js$'          # Exclusion regex
//! rec = true                      # Recurse into subdirectories
//! paths = ["../vendor"]           # Extra search paths for detection
//! # detect = ["app/main"]         # Follow require() from these modules instead
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Pattern;
use crate::utils::path::resolve_path;

/// Dependency-detection strategy: the entry modules to start from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Detect {
    pub modules: Vec<String>,
}

impl Detect {
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }
}

/// Discovery options.
///
/// The pipeline keeps one value of this built from defaults and `kiln.toml`;
/// per-call options are fresh copies of it with builder overrides applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    /// Follow `require()` from these modules instead of listing a directory.
    pub detect: Option<Detect>,
    /// Directory to list (defaults to the pipeline root).
    pub root: Option<PathBuf>,
    /// Inclusion pattern.
    pub pattern: Option<Pattern>,
    /// Exclusion pattern.
    pub filter: Option<Pattern>,
    /// Recurse into subdirectories.
    pub rec: bool,
    /// Extra search paths registered for dependency detection.
    pub paths: Vec<PathBuf>,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            detect: None,
            root: None,
            pattern: Some(Pattern::any_extension()),
            filter: None,
            rec: true,
            paths: Vec::new(),
        }
    }
}

impl FindOptions {
    pub fn with_detect(mut self, detect: Detect) -> Self {
        self.detect = Some(detect);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_pattern(mut self, pattern: Option<Pattern>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_filter(mut self, filter: Option<Pattern>) -> Self {
        self.filter = filter;
        self
    }

    pub fn recursive(mut self, rec: bool) -> Self {
        self.rec = rec;
        self
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a listed path survives filter and pattern.
    pub fn accepts(&self, path: &str) -> bool {
        self.filter.as_ref().is_none_or(|f| !f.is_match(path))
            && self.pattern.as_ref().is_none_or(|p| p.is_match(path))
    }

    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if let Some(root) = &mut self.root {
            *root = resolve_path(root, base);
        }
        for path in &mut self.paths {
            *path = resolve_path(path, base);
        }
    }
}
