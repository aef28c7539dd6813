//! Ordered processing of file-set entries.

use std::borrow::Cow;

use super::Build;
use crate::config::ProcessConfig;
use crate::error::{BuildError, Result};
use crate::fileset::{EntryKey, FileSet};
use crate::processor::{ProcessContext, Processor, ProcessorOptions};
use crate::{debug, log};

impl Build {
    /// Run every enabled processor over the matching entries.
    ///
    /// `overrides` is layered onto the pipeline-level `[process]` settings for
    /// this call only. Processors run in the pipeline's order, whatever order
    /// `overrides` lists them in, and each one sees the output of the ones
    /// before it. Every stage is resolved before the first one runs, so an
    /// unknown name or a bad option fails without touching any entry. Names
    /// are checked whether they are switched on or off.
    pub fn process(&mut self, overrides: &ProcessConfig) -> Result<&mut Self> {
        let layered = self.config.process.layer(overrides);
        if let Some(name) = layered
            .processors
            .keys()
            .find(|name| !self.registry.contains(name))
        {
            return Err(BuildError::UnknownProcessor(name.clone()));
        }

        let mut stages: Vec<(&dyn Processor, ProcessorOptions)> = Vec::new();
        for name in layered.enabled() {
            let processor = self
                .registry
                .get(name)
                .ok_or_else(|| BuildError::UnknownProcessor(name.to_string()))?;
            let options = processor.defaults().merged(layered.options(name))?;
            stages.push((processor, options));
        }

        let keys = self.files.sorted_keys();
        for (processor, options) in &stages {
            let mut count = 0;
            for key in &keys {
                if !options.applies_to(&key.as_str()) {
                    continue;
                }
                let Some(text) = self.files.get_text(key).map(Cow::into_owned) else {
                    continue;
                };

                let ctx = ProcessContext {
                    root: &self.root,
                    files: &self.files,
                };
                let output = processor.run(&ctx, key, &text, options).map_err(|err| {
                    BuildError::Processor {
                        name: processor.name().to_string(),
                        path: key.to_string(),
                        source: err.into(),
                    }
                })?;

                self.files.insert(key.clone(), output);
                count += 1;
            }
            debug!("process"; "{}: {} files", processor.name(), count);
        }

        log!("process"; "{} processors over {} files", stages.len(), keys.len());
        Ok(self)
    }

    /// Call `callback` once per entry, in key order.
    ///
    /// The callback gets the file set itself and may change it freely;
    /// entries it removes are not visited afterwards. No pattern gating
    /// applies.
    pub fn process_with<F>(&mut self, mut callback: F) -> Result<&mut Self>
    where
        F: FnMut(&mut FileSet, &EntryKey, &str) -> anyhow::Result<()>,
    {
        for key in self.files.sorted_keys() {
            let Some(text) = self.files.get_text(&key).map(Cow::into_owned) else {
                continue;
            };
            callback(&mut self.files, &key, &text).map_err(|err| BuildError::Callback {
                path: key.to_string(),
                source: err.into(),
            })?;
        }
        Ok(self)
    }
}
