//! `kiln build` and `kiln clean`.
//!
//! Build phases:
//! - **Find** - `[find]` discovery, then `[build] add` entries
//! - **Process** - enabled processors in pipeline order
//! - **Combine** - `[combine]` targets, when any are configured
//! - **Write** - optional clean, then write-back to `build.output`

use anyhow::Result;

use crate::config::{KilnConfig, ProcessConfig};
use crate::error::BuildError;
use crate::pipeline::Build;

/// Run the whole pipeline as configured.
pub fn build_project(config: &KilnConfig) -> Result<()> {
    let output = config
        .build
        .output
        .clone()
        .ok_or(BuildError::MissingTarget)?;

    let mut build = Build::with_config(config.clone())?;
    build.find_defaults()?;
    for entry in &config.build.add {
        build.add(entry.source(), entry.target())?;
    }

    build.process(&ProcessConfig::new())?;
    if !config.combine.is_empty() {
        build.combine(&config.combine)?;
    }

    if config.build.clean {
        build.cleanup(&output)?;
    }
    build.write(&output)?;
    build.end(None);
    Ok(())
}

/// Remove the configured output directory.
pub fn clean_output(config: &KilnConfig) -> Result<()> {
    let output = config
        .build
        .output
        .as_deref()
        .ok_or(BuildError::MissingTarget)?;

    let mut build = Build::with_config(config.clone())?;
    build.cleanup(output)?;
    build.end(Some("output removed"));
    Ok(())
}
