//! `[combine]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [combine]
//! css = "bundle.css"      # every *.css entry → <output>/bundle.css
//! js = "js/app.js"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mapping of file extension to combined output path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombineConfig {
    pub targets: BTreeMap<String, PathBuf>,
}

impl CombineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the target for one extension.
    pub fn with(mut self, ext: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        self.targets.insert(ext.into(), target.into());
        self
    }

    /// Layer `overrides` on top of `self`, returning a fresh value.
    pub fn layer(&self, overrides: &Self) -> Self {
        let mut layered = self.clone();
        layered.targets.extend(
            overrides
                .targets
                .iter()
                .map(|(ext, target)| (ext.clone(), target.clone())),
        );
        layered
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.targets.iter().map(|(ext, target)| (ext.as_str(), target.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_overrides_per_extension() {
        let base = CombineConfig::new().with("css", "a.css").with("js", "a.js");
        let layered = base.layer(&CombineConfig::new().with("css", "b.css"));

        assert_eq!(layered.targets["css"], PathBuf::from("b.css"));
        assert_eq!(layered.targets["js"], PathBuf::from("a.js"));
        // base untouched
        assert_eq!(base.targets["css"], PathBuf::from("a.css"));
    }

    #[test]
    fn test_parse_toml() {
        let config: CombineConfig = toml::from_str("css = '/out/bundle.css'").unwrap();
        assert_eq!(config.iter().count(), 1);
        assert_eq!(config.targets["css"], PathBuf::from("/out/bundle.css"));
    }
}
