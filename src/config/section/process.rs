//! `[process]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [process]
//! minify-js = false                                   # disable one processor
//! absolutize-css-paths = { prefix = "https://cdn.example.com" }
//! vendor-prefix-css = { filter = 'vendor/', safari = 12 }
//! # order = [...]                                     # full processor order
//! ```
//!
//! Every processor listed in `order` is enabled unless switched off here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::processor::DEFAULT_ORDER;

/// Per-processor switch: a plain flag or a table of options (implies enabled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Enabled(bool),
    Options(toml::Table),
}

impl Toggle {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Options(_) => true,
        }
    }

    #[inline]
    pub fn options(&self) -> Option<&toml::Table> {
        match self {
            Self::Enabled(_) => None,
            Self::Options(table) => Some(table),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Relative order processors run in.
    pub order: Vec<String>,

    /// Toggles keyed by processor name.
    #[serde(flatten)]
    pub processors: BTreeMap<String, Toggle>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER.iter().map(ToString::to_string).collect(),
            processors: BTreeMap::new(),
        }
    }
}

impl ProcessConfig {
    /// Empty overrides: every processor keeps its pipeline-level setting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides switching every default processor off.
    pub fn disabled() -> Self {
        let mut config = Self::default();
        for name in DEFAULT_ORDER {
            config.processors.insert(name.to_string(), Toggle::Enabled(false));
        }
        config
    }

    pub fn enable(mut self, name: impl Into<String>) -> Self {
        self.processors.insert(name.into(), Toggle::Enabled(true));
        self
    }

    pub fn disable(mut self, name: impl Into<String>) -> Self {
        self.processors.insert(name.into(), Toggle::Enabled(false));
        self
    }

    pub fn with_options(mut self, name: impl Into<String>, options: toml::Table) -> Self {
        self.processors.insert(name.into(), Toggle::Options(options));
        self
    }

    /// Layer `overrides` on top of `self`, returning a fresh value.
    ///
    /// Toggles are replaced per processor name. The order always stays the
    /// one of `self`: it belongs to the pipeline, not to a single call.
    pub fn layer(&self, overrides: &Self) -> Self {
        let mut layered = self.clone();
        layered.processors.extend(
            overrides
                .processors
                .iter()
                .map(|(name, toggle)| (name.clone(), toggle.clone())),
        );
        layered
    }

    /// Processors without a toggle are enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.processors.get(name).is_none_or(Toggle::is_enabled)
    }

    pub fn options(&self, name: &str) -> Option<&toml::Table> {
        self.processors.get(name).and_then(Toggle::options)
    }

    /// Enabled processor names, in run order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|name| self.is_enabled(name))
    }
}
