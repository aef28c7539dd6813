//! Pipeline configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── find       # [find]
//! │   ├── process    # [process]
//! │   └── combine    # [combine]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   ├── field      # FieldPath
//! │   └── pattern    # Pattern (regex path matcher)
//! └── mod.rs         # KilnConfig (this file)
//! ```
//!
//! # Layering
//!
//! Values come from three layers: built-in defaults (serde defaults), the
//! config file, and per-call options. The pipeline stores the first two
//! merged; each operation builds a fresh value for the third and never
//! writes back into the stored one.

pub mod section;
pub mod types;
mod util;

pub use section::{
    AddEntry, BuildSectionConfig, CombineConfig, Detect, FindOptions, ProcessConfig, Toggle,
};
pub use types::{ANY_EXTENSION, ConfigError, FieldPath, Pattern};
pub use util::{find_config_file, find_config_file_from};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;
use crate::processor::{MINIFY_CSS, MINIFY_JS};
use crate::utils::path::normalize_path;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KilnConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Source root, output and explicit additions
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Discovery settings
    #[serde(default)]
    pub find: FindOptions,

    /// Processor toggles and order
    #[serde(default)]
    pub process: ProcessConfig,

    /// Extension → combined output
    #[serde(default)]
    pub combine: CombineConfig,
}

impl KilnConfig {
    /// Configuration with only the source root set.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.build.root = Some(root.into());
        config
    }

    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file, resolves relative paths
    /// against its directory and applies command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.finalize(&normalize_path(&config_path));
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Record the config location and resolve relative paths against it.
    fn finalize(&mut self, config_path: &Path) {
        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.build.resolve_paths(&base);
        self.find.resolve_paths(&base);
        self.config_path = config_path.to_path_buf();
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.build.root {
            None => Err(ConfigError::validation(
                FieldPath::new("build.root"),
                "is required",
            )),
            Some(root) if root.as_os_str().is_empty() => Err(ConfigError::validation(
                FieldPath::new("build.root"),
                "must not be empty",
            )),
            Some(_) => Ok(()),
        }
    }

    /// Get the configured source root, if any
    pub fn root(&self) -> Option<&Path> {
        self.build.root.as_deref()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Clean { output } => {
                if let Some(output) = output {
                    self.build.output = Some(normalize_path(output));
                }
            }
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        if let Some(output) = &args.output {
            self.build.output = Some(normalize_path(output));
        }
        self.build.clean |= args.clean;

        if let Some(minify) = args.minify {
            for name in [MINIFY_JS, MINIFY_CSS] {
                self.process
                    .processors
                    .insert(name.to_string(), Toggle::Enabled(minify));
            }
        }
    }
}

/// Parse a complete config string, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KilnConfig {
    let (parsed, ignored) = KilnConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
