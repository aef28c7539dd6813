//! Dependency detection for discovery.
//!
//! A [`DependencyFinder`] turns a [`Detect`] description into the ordered
//! list of files a build needs. The default [`RequireFinder`] follows static
//! `require("id")` calls from a set of entry modules.
//!
//! # Resolution
//!
//! ```text
//! require("ui/menu")   →  <search path>/ui/menu
//!                         <search path>/ui/menu.js
//!                         <search path>/ui/menu/index.js
//! require("./item")    →  same candidates, requiring file's dir first
//! ```
//!
//! Search paths are tried in order; the first existing file wins.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::Detect;
use crate::debug;
use crate::error::{BuildError, Result};
use crate::utils::path::clean_path;

/// `require("id")` / `require('id')`; `require.def(` is not a match.
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*(?:"([^"]+)"|'([^']+)')\s*\)"#).unwrap()
});

// =============================================================================
// DependencyFinder
// =============================================================================

/// Resolves a detection description into absolute file paths.
pub trait DependencyFinder: Send + Sync + std::fmt::Debug {
    /// Files needed by `detect`, each listed once, dependencies first.
    fn find(&self, detect: &Detect, search_paths: &[PathBuf]) -> Result<Vec<PathBuf>>;
}

/// Finder following CommonJS-style `require` calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireFinder;

impl DependencyFinder for RequireFinder {
    fn find(&self, detect: &Detect, search_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut walk = Walk {
            search_paths,
            seen: FxHashSet::default(),
            order: Vec::new(),
        };

        let origin = search_paths.first().cloned().unwrap_or_default();
        for module in &detect.modules {
            let path = walk
                .resolve(module, None)
                .ok_or_else(|| BuildError::Detection {
                    module: module.clone(),
                    from: origin.clone(),
                })?;
            walk.visit(path)?;
        }

        Ok(walk.order)
    }
}

/// State of one depth-first traversal.
struct Walk<'a> {
    search_paths: &'a [PathBuf],
    seen: FxHashSet<PathBuf>,
    order: Vec<PathBuf>,
}

impl Walk<'_> {
    /// Post-order visit: a file is listed after everything it requires.
    ///
    /// Files are marked before their requirements are followed, so cycles
    /// terminate; the file closing a cycle is listed first.
    fn visit(&mut self, path: PathBuf) -> Result<()> {
        if !self.seen.insert(path.clone()) {
            return Ok(());
        }

        let source = fs::read_to_string(&path).map_err(|err| BuildError::io(&path, err))?;
        let dir = path.parent().map(Path::to_path_buf);

        for id in required_ids(&source) {
            let dep = self
                .resolve(id, dir.as_deref())
                .ok_or_else(|| BuildError::Detection {
                    module: id.to_string(),
                    from: path.clone(),
                })?;
            debug!("find"; "{} requires {}", path.display(), dep.display());
            self.visit(dep)?;
        }

        self.order.push(path);
        Ok(())
    }

    /// First existing candidate for `id`.
    fn resolve(&self, id: &str, from_dir: Option<&Path>) -> Option<PathBuf> {
        let relative = id.starts_with("./") || id.starts_with("../");
        let local = from_dir.filter(|_| relative);

        local
            .into_iter()
            .chain(self.search_paths.iter().map(PathBuf::as_path))
            .flat_map(|base| candidates(base, id))
            .find(|candidate| candidate.is_file())
    }
}

fn candidates(base: &Path, id: &str) -> [PathBuf; 3] {
    let module = clean_path(&base.join(id));
    let with_ext = clean_path(&base.join(format!("{id}.js")));
    let index = module.join("index.js");
    [module, with_ext, index]
}

/// Module ids required by `source`, in order of appearance.
fn required_ids(source: &str) -> impl Iterator<Item = &str> {
    REQUIRE.captures_iter(source).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
    })
}
