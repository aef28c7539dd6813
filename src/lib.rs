//! Kiln - an asset build pipeline.
//!
//! Discovers files under a source root, runs named processors over them in
//! a fixed order, merges groups of files by extension and writes the result
//! to a target directory.

pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod fileset;
pub mod logger;
pub mod pipeline;
pub mod processor;
pub mod utils;

pub use config::{CombineConfig, Detect, FindOptions, KilnConfig, Pattern, ProcessConfig};
pub use deps::{DependencyFinder, RequireFinder};
pub use error::{BuildError, Result};
pub use fileset::{EntryKey, FileSet};
pub use pipeline::Build;
pub use processor::{ProcessContext, Processor, ProcessorOptions, Registry};
