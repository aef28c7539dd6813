//! Writing the file set back to disk.

use std::fs;
use std::path::Path;

use super::Build;
use crate::error::{BuildError, Result};
use crate::utils::path::normalize_path;
use crate::utils::walk::create_dirs;
use crate::{debug, log};

impl Build {
    /// Write every entry under `target`, creating directories as needed.
    ///
    /// Output paths follow [`EntryKey::output_path`](crate::EntryKey::output_path).
    /// Existing files are overwritten; files already written stay on disk
    /// if a later write fails.
    pub fn write(&mut self, target: impl AsRef<Path>) -> Result<&mut Self> {
        let target = target.as_ref();
        if target.as_os_str().is_empty() {
            return Err(BuildError::MissingTarget);
        }
        let target = normalize_path(target);

        let keys = self.files.sorted_keys();
        for key in &keys {
            let Some(content) = self.files.get(key) else {
                continue;
            };
            let path = target.join(key.output_path(&self.root));
            if let Some(parent) = path.parent() {
                create_dirs(parent).map_err(|err| BuildError::io(parent, err))?;
            }
            fs::write(&path, content).map_err(|err| BuildError::io(&path, err))?;
            debug!("write"; "{}", path.display());
        }

        log!("write"; "{} files to {}", keys.len(), target.display());
        Ok(self)
    }
}
