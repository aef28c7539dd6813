//! The build pipeline.
//!
//! # Architecture
//!
//! ```text
//! Build::new(root)
//!   │
//!   ├── find / add        disk → FileSet           (discover.rs)
//!   ├── process           FileSet → FileSet        (process.rs)
//!   ├── combine           many entries → one       (combine.rs)
//!   ├── write             FileSet → target dir     (write.rs)
//!   └── end               elapsed time report
//! ```
//!
//! Every operation runs to completion, or fails, before returning. Nothing
//! is rolled back on failure: entries already replaced and files already
//! written stay as they are.
//!
//! # Example
//!
//! ```ignore
//! let mut build = Build::new("site/src")?;
//! build
//!     .find_defaults()?
//!     .process(&ProcessConfig::new())?
//!     .combine(&CombineConfig::new().with("css", "bundle.css"))?
//!     .write("site/dist")?;
//! build.end(None);
//! ```

mod combine;
mod discover;
mod process;
mod write;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::KilnConfig;
use crate::deps::{DependencyFinder, RequireFinder};
use crate::error::{BuildError, Result};
use crate::fileset::FileSet;
use crate::log;
use crate::processor::Registry;
use crate::utils::path::normalize_path;
use crate::utils::walk::remove_dir_all;

/// One pipeline instance over a source root.
#[derive(Debug)]
pub struct Build {
    root: PathBuf,
    search_paths: Vec<PathBuf>,
    config: KilnConfig,
    files: FileSet,
    registry: Registry,
    finder: Box<dyn DependencyFinder>,
    started: Instant,
}

impl Build {
    /// Pipeline over `root` with built-in defaults.
    ///
    /// Relative roots resolve against the current directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(BuildError::MissingRoot);
        }
        let root = normalize_path(root);

        Ok(Self {
            search_paths: vec![root.clone()],
            config: KilnConfig::with_root(&root),
            root,
            files: FileSet::new(),
            registry: Registry::builtin(),
            finder: Box::new(RequireFinder),
            started: Instant::now(),
        })
    }

    /// Pipeline whose pipeline-level defaults come from `config`.
    pub fn with_config(mut config: KilnConfig) -> Result<Self> {
        let root = config.root().ok_or(BuildError::MissingRoot)?.to_path_buf();
        let mut build = Self::new(root)?;
        config.build.root = Some(build.root.clone());
        build.config = config;
        Ok(build)
    }

    /// Replace the dependency finder used by `find` with `detect`.
    pub fn with_finder(mut self, finder: impl DependencyFinder + 'static) -> Self {
        self.finder = Box::new(finder);
        self
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    #[inline]
    pub fn config(&self) -> &KilnConfig {
        &self.config
    }

    #[inline]
    pub fn files(&self) -> &FileSet {
        &self.files
    }

    #[inline]
    pub fn files_mut(&mut self) -> &mut FileSet {
        &mut self.files
    }

    /// Processors available to `process`; register custom ones here.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Remove a directory tree, typically the previous output.
    pub fn cleanup(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = normalize_path(path.as_ref());
        remove_dir_all(&path).map_err(|err| BuildError::io(&path, err))?;
        crate::debug!("clean"; "removed {}", path.display());
        Ok(self)
    }

    /// Report elapsed time since construction.
    pub fn end(&self, message: Option<&str>) -> Duration {
        let elapsed = self.started.elapsed();
        log!(
            "done";
            "{}, runtime: {} ms",
            message.unwrap_or("build was successful"),
            elapsed.as_millis()
        );
        elapsed
    }
}
