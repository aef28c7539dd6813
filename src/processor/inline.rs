//! Inlining processors for stylesheets.
//!
//! - `inline-data-images`: small images become `data:` URIs
//! - `inline-css-imports`: `@import` rules are replaced by the imported sheet

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Captures;
use rustc_hash::FxHashSet;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use super::urls::{CSS_IMPORT, CSS_URL, capture_link, resolve_link, try_replace_all};
use super::{
    CSS_FILES, INLINE_CSS_IMPORTS, INLINE_DATA_IMAGES, ProcessContext, Processor, ProcessorOptions,
};
use crate::EntryKey;
use crate::debug;
use crate::utils::mime;
use crate::utils::path::{LinkKind, clean_path, relative_path, split_link_suffix, to_slash};

/// Images above this size (bytes) stay external by default.
pub const DEFAULT_MAX_SIZE: i64 = 4096;

/// Content of `path`, from the file set if present, else from disk.
fn read_source<'a>(ctx: &ProcessContext<'a>, path: &Path) -> Option<Cow<'a, [u8]>> {
    match ctx.files.get_path(path) {
        Some(bytes) => Some(Cow::Borrowed(bytes)),
        None => fs::read(path).ok().map(Cow::Owned),
    }
}

// ============================================================================
// inline-data-images
// ============================================================================

pub struct InlineDataImages;

impl Processor for InlineDataImages {
    fn name(&self) -> &'static str {
        INLINE_DATA_IMAGES
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(CSS_FILES.clone()).with("max-size", DEFAULT_MAX_SIZE)
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        options: &ProcessorOptions,
    ) -> Result<String> {
        let max_size = options
            .get_integer("max-size")
            .unwrap_or(DEFAULT_MAX_SIZE)
            .max(0) as usize;
        let base = key.base_dir(ctx.root);

        let out = CSS_URL.replace_all(text, |caps: &Captures<'_>| {
            inline_image(ctx, &base, caps, max_size).unwrap_or_else(|| caps[0].to_string())
        });
        Ok(out.into_owned())
    }
}

/// Replacement for one `url()` match, or `None` to keep it.
fn inline_image(
    ctx: &ProcessContext<'_>,
    base: &Path,
    caps: &Captures<'_>,
    max_size: usize,
) -> Option<String> {
    let link = capture_link(caps, &[1, 2, 3])?;
    if !split_link_suffix(link.value).1.is_empty() {
        return None;
    }
    let path = resolve_link(ctx.root, base, link.value)?;
    let mime = mime::from_path(&path);
    if !mime::is_inlinable_image(mime) {
        return None;
    }

    let bytes = read_source(ctx, &path)?;
    if bytes.len() > max_size {
        debug!("inline"; "{} is {} bytes, keeping url", path.display(), bytes.len());
        return None;
    }

    let data = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
    Some(format!("url({})", link.quoted(&data)))
}

// ============================================================================
// inline-css-imports
// ============================================================================

pub struct InlineCssImports;

impl Processor for InlineCssImports {
    fn name(&self) -> &'static str {
        INLINE_CSS_IMPORTS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(CSS_FILES.clone())
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        _options: &ProcessorOptions,
    ) -> Result<String> {
        let mut seen = FxHashSet::default();
        seen.insert(key.path().to_path_buf());
        expand_imports(ctx, text, &key.base_dir(ctx.root), &mut seen)
    }
}

/// Replace every local `@import` in `text` by the imported sheet.
///
/// Imports already in `seen` are dropped, so each sheet is inlined at most
/// once and cycles terminate.
fn expand_imports(
    ctx: &ProcessContext<'_>,
    text: &str,
    base: &Path,
    seen: &mut FxHashSet<PathBuf>,
) -> Result<String> {
    try_replace_all(&CSS_IMPORT, text, |caps| {
        let Some(link) = capture_link(caps, &[1, 2, 3]).or_else(|| capture_link(caps, &[4, 5]))
        else {
            return Ok(caps[0].to_string());
        };
        let Some(path) = resolve_link(ctx.root, base, link.value) else {
            return Ok(caps[0].to_string());
        };
        if !seen.insert(path.clone()) {
            return Ok(String::new());
        }

        let imported = read_source(ctx, &path)
            .with_context(|| format!("imported stylesheet `{}` not found", path.display()))?;
        let imported = String::from_utf8_lossy(&imported).into_owned();
        let dir = path.parent().unwrap_or(ctx.root);

        let expanded = expand_imports(ctx, &imported, dir, seen)?;
        Ok(rebase_urls(&expanded, dir, base))
    })
}

/// Rewrite relative `url()`s written for `from` so they work from `to`.
fn rebase_urls(text: &str, from: &Path, to: &Path) -> String {
    if from == to {
        return text.to_string();
    }
    CSS_URL
        .replace_all(text, |caps: &Captures<'_>| {
            let Some(link) = capture_link(caps, &[1, 2, 3]) else {
                return caps[0].to_string();
            };
            let (path, suffix) = split_link_suffix(link.value);
            match LinkKind::parse(path) {
                LinkKind::FileRelative(path) if !path.is_empty() => {
                    let target = clean_path(&from.join(path));
                    let rebased = format!("{}{suffix}", to_slash(&relative_path(to, &target)));
                    format!("url({})", link.quoted(&rebased))
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
