//! Rewrite file-relative links into root-absolute ones.
//!
//! `../img/a.png` in `/root/css/app.css` becomes `/img/a.png`, optionally
//! behind a `prefix` such as a CDN origin. Root-absolute, external and
//! fragment links are left as written, as are links escaping the root.

use anyhow::Result;
use regex::Captures;
use std::path::Path;

use super::urls::{CSS_URL, HTML_ATTR, capture_link};
use super::{
    ABSOLUTIZE_CSS_PATHS, ABSOLUTIZE_HTML_PATHS, CSS_FILES, HTML_FILES, ProcessContext,
    Processor, ProcessorOptions,
};
use crate::EntryKey;
use crate::utils::path::{LinkKind, clean_path, relative_to_root, split_link_suffix, to_slash};

/// Root-absolute form of a file-relative `link`, or `None` to keep it.
fn absolutize(root: &Path, base: &Path, link: &str, prefix: &str) -> Option<String> {
    let (path, suffix) = split_link_suffix(link.trim());
    let LinkKind::FileRelative(path) = LinkKind::parse(path) else {
        return None;
    };
    if path.is_empty() {
        return None;
    }
    let rel = relative_to_root(&clean_path(&base.join(path)), root)?;
    Some(format!(
        "{}/{}{suffix}",
        prefix.trim_end_matches('/'),
        to_slash(&rel)
    ))
}

fn prefix(options: &ProcessorOptions) -> &str {
    options.get_str("prefix").unwrap_or_default()
}

pub struct AbsolutizeCssPaths;

impl Processor for AbsolutizeCssPaths {
    fn name(&self) -> &'static str {
        ABSOLUTIZE_CSS_PATHS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(CSS_FILES.clone()).with("prefix", "")
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        options: &ProcessorOptions,
    ) -> Result<String> {
        let base = key.base_dir(ctx.root);
        let prefix = prefix(options);

        let out = CSS_URL.replace_all(text, |caps: &Captures<'_>| {
            capture_link(caps, &[1, 2, 3])
                .and_then(|link| {
                    absolutize(ctx.root, &base, link.value, prefix)
                        .map(|abs| format!("url({})", link.quoted(&abs)))
                })
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(out.into_owned())
    }
}

pub struct AbsolutizeHtmlPaths;

impl Processor for AbsolutizeHtmlPaths {
    fn name(&self) -> &'static str {
        ABSOLUTIZE_HTML_PATHS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(HTML_FILES.clone()).with("prefix", "")
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        options: &ProcessorOptions,
    ) -> Result<String> {
        let base = key.base_dir(ctx.root);
        let prefix = prefix(options);

        let out = HTML_ATTR.replace_all(text, |caps: &Captures<'_>| {
            capture_link(caps, &[3, 4])
                .and_then(|link| {
                    absolutize(ctx.root, &base, link.value, prefix)
                        .map(|abs| format!("{}{}={}", &caps[1], &caps[2], link.quoted(&abs)))
                })
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(out.into_owned())
    }
}
