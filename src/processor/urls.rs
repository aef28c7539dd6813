//! Link scanning shared by the inlining and absolutizing processors.
//!
//! - `url(...)` references in stylesheets
//! - `@import` rules in stylesheets
//! - `src=` / `href=` attributes in markup

use anyhow::Result;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::utils::path::{LinkKind, clean_path, split_link_suffix};

/// `url("x")`, `url('x')` or `url(x)`; groups 1..=3 hold the link.
pub(super) static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]*))\s*\)"#).unwrap()
});

/// `@import url(...)`, `@import "x"` or `@import 'x'` without a media list.
///
/// Groups 1..=3 hold a `url()` link, groups 4..=5 a bare string.
pub(super) static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"@import\s+(?:url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]*))\s*\)|"([^"]*)"|'([^']*)')\s*;"#,
    )
    .unwrap()
});

/// `src=`/`href=` attributes with a quoted value.
///
/// Group 1 is the preceding whitespace, group 2 the attribute name, groups
/// 3..=4 the value.
pub(super) static HTML_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\s)(src|href)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// A quoted or bare link captured by one of the patterns above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Link<'t> {
    pub quote: &'static str,
    pub value: &'t str,
}

impl Link<'_> {
    /// Re-quote `value` the way the original link was quoted.
    pub fn quoted(&self, value: &str) -> String {
        format!("{q}{value}{q}", q = self.quote)
    }
}

/// First matching group of `groups`, tagged with the quote it implies.
///
/// `groups` lists double-quoted, single-quoted and (optionally) bare groups
/// in that order.
pub(super) fn capture_link<'t>(caps: &Captures<'t>, groups: &[usize]) -> Option<Link<'t>> {
    const QUOTES: [&str; 3] = ["\"", "'", ""];
    groups
        .iter()
        .zip(QUOTES)
        .find_map(|(&group, quote)| caps.get(group).map(|m| Link { quote, value: m.as_str() }))
}

/// Like `Regex::replace_all`, but the replacer may fail.
pub(super) fn try_replace_all<F>(re: &Regex, text: &str, mut replace: F) -> Result<String>
where
    F: FnMut(&Captures<'_>) -> Result<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// On-disk path a local link points at, without its query or fragment.
///
/// Root-absolute links resolve against the pipeline root, relative ones
/// against `base`. External links, fragments and empty links yield `None`.
pub(super) fn resolve_link(root: &Path, base: &Path, link: &str) -> Option<PathBuf> {
    let (path, _) = split_link_suffix(link.trim());
    if path.is_empty() {
        return None;
    }
    // `my%20logo.png` names `my logo.png` on disk
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    match LinkKind::parse(&decoded) {
        LinkKind::External(_) | LinkKind::Fragment(_) => None,
        LinkKind::SiteRoot(path) => Some(clean_path(&root.join(path.trim_start_matches('/')))),
        LinkKind::FileRelative(path) => Some(clean_path(&base.join(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_url_variants() {
        let css = r#"a{background:url("a.png")} b{background:url('b.png')} c{background:url( c.png )}"#;
        let links: Vec<_> = CSS_URL
            .captures_iter(css)
            .filter_map(|caps| capture_link(&caps, &[1, 2, 3]))
            .collect();
        assert_eq!(
            links,
            vec![
                Link { quote: "\"", value: "a.png" },
                Link { quote: "'", value: "b.png" },
                Link { quote: "", value: "c.png" },
            ]
        );
    }

    #[test]
    fn test_css_import_variants() {
        let css = "@import \"a.css\";\n@import url(b.css);\n@import 'c.css' screen;\n";
        let links: Vec<_> = CSS_IMPORT
            .captures_iter(css)
            .filter_map(|caps| {
                capture_link(&caps, &[1, 2, 3]).or_else(|| capture_link(&caps, &[4, 5]))
            })
            .map(|link| link.value)
            .collect();
        // media-qualified imports are left alone
        assert_eq!(links, vec!["a.css", "b.css"]);
    }

    #[test]
    fn test_html_attr_skips_data_attributes() {
        let html = r#"<img src="a.png" data-src="b.png"><a HREF='c.html'>"#;
        let values: Vec<_> = HTML_ATTR
            .captures_iter(html)
            .filter_map(|caps| capture_link(&caps, &[3, 4]))
            .map(|link| link.value)
            .collect();
        assert_eq!(values, vec!["a.png", "c.html"]);
    }

    #[test]
    fn test_try_replace_all_propagates_errors() {
        let out = try_replace_all(&CSS_URL, "url(a) url(b)", |caps| {
            Ok(format!("url(<{}>)", &caps[3]))
        })
        .unwrap();
        assert_eq!(out, "url(<a>) url(<b>)");

        let err = try_replace_all(&CSS_URL, "url(a)", |_| anyhow::bail!("boom"));
        assert!(err.is_err());
    }

    #[test]
    fn test_resolve_link() {
        let root = Path::new("/site");
        let base = Path::new("/site/css");
        assert_eq!(
            resolve_link(root, base, "../img/a.png?v=1"),
            Some(PathBuf::from("/site/img/a.png"))
        );
        assert_eq!(
            resolve_link(root, base, "/img/a.png"),
            Some(PathBuf::from("/site/img/a.png"))
        );
        assert_eq!(resolve_link(root, base, "https://cdn.example.com/a.png"), None);
        assert_eq!(resolve_link(root, base, "data:image/png;base64,AAAA"), None);
        assert_eq!(resolve_link(root, base, "#icon"), None);
        assert_eq!(resolve_link(root, base, ""), None);
        assert_eq!(
            resolve_link(root, base, "my%20logo.png"),
            Some(PathBuf::from("/site/css/my logo.png"))
        );
    }
}
