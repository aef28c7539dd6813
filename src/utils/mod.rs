//! Utility modules shared by the pipeline and the processors.
//!
//! - [`path`]: path normalization and URL-ish link helpers
//! - [`walk`]: recursive listing, removal and directory creation
//! - [`mime`]: MIME type detection for data URIs

pub mod mime;
pub mod path;
pub mod walk;
