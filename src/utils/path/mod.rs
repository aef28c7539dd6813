//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`, `clean_path`)
//! - [`route`]: Link utilities (`is_external_link`, `split_link_suffix`, `LinkKind`)

pub mod fs;
pub mod route;

pub use fs::{
    clean_path, normalize_path, relative_path, relative_to_root, resolve_path, to_slash,
};
pub use route::{LinkKind, is_external_link, split_link_suffix};
