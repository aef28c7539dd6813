//! MIME types for data URIs.

use std::path::Path;

pub mod types {
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
    pub const CSS: &str = "text/css";
    pub const JAVASCRIPT: &str = "text/javascript";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess the MIME type of `path` from its extension, ignoring case.
pub fn from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("svg") => types::SVG,
        Some("css") => types::CSS,
        Some("js") => types::JAVASCRIPT,
        _ => types::OCTET_STREAM,
    }
}

/// Image types that may be embedded into stylesheets.
pub fn is_inlinable_image(mime: &str) -> bool {
    matches!(
        mime,
        types::PNG | types::JPEG | types::GIF | types::SVG | types::WEBP
    )
}
