//! Merging entries by extension.

use super::Build;
use crate::config::CombineConfig;
use crate::error::Result;
use crate::fileset::EntryKey;
use crate::log;

impl Build {
    /// Concatenate every entry ending in `.<ext>` into its target.
    ///
    /// Sources are appended in key order, each followed by a newline, and
    /// removed from the file set. The target entry is created on the first
    /// match; a target that already exists is appended to, never consumed as
    /// a source. Several extensions may share one target.
    pub fn combine(&mut self, targets: &CombineConfig) -> Result<&mut Self> {
        for (ext, target) in targets.iter() {
            let target_key = EntryKey::for_target(&self.root, target);
            let sources: Vec<EntryKey> = self
                .files
                .sorted_keys()
                .into_iter()
                .filter(|key| *key != target_key && key.has_extension(ext))
                .collect();
            if sources.is_empty() {
                continue;
            }

            let mut combined = self.files.remove(&target_key).unwrap_or_default();
            for key in &sources {
                if let Some(content) = self.files.remove(key) {
                    combined.extend_from_slice(&content);
                    combined.push(b'\n');
                }
            }

            log!("combine"; "{} {} files -> {}", sources.len(), ext, target_key);
            self.files.insert(target_key, combined);
        }
        Ok(self)
    }
}
