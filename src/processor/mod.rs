//! Named content processors and their registry.
//!
//! # Module Structure
//!
//! ```text
//! processor/
//! ├── transport.rs   # transport-wrap-js, wrap-text-as-module
//! ├── minify.rs      # minify-js, minify-css
//! ├── prefix.rs      # vendor-prefix-css
//! ├── inline.rs      # inline-data-images, inline-css-imports
//! ├── absolutize.rs  # absolutize-css-paths, absolutize-html-paths
//! └── urls.rs        # url()/@import/src=/href= scanning shared by the above
//! ```
//!
//! A processor only ever replaces the content of an entry. It never adds,
//! removes or renames keys; the engine relies on that to keep the set of
//! visited keys stable across all stages of one `process` call.

mod absolutize;
mod inline;
mod minify;
mod prefix;
mod transport;
mod urls;

pub use absolutize::{AbsolutizeCssPaths, AbsolutizeHtmlPaths};
pub use inline::{InlineCssImports, InlineDataImages};
pub use minify::{MinifyCss, MinifyJs};
pub use prefix::VendorPrefixCss;
pub use transport::{TransportWrapJs, WrapTextAsModule};

use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::{ConfigError, FieldPath, Pattern};
use crate::fileset::FileSet;

// ============================================================================
// Names and order
// ============================================================================

pub const TRANSPORT_WRAP_JS: &str = "transport-wrap-js";
pub const MINIFY_JS: &str = "minify-js";
pub const VENDOR_PREFIX_CSS: &str = "vendor-prefix-css";
pub const INLINE_DATA_IMAGES: &str = "inline-data-images";
pub const INLINE_CSS_IMPORTS: &str = "inline-css-imports";
pub const MINIFY_CSS: &str = "minify-css";
pub const ABSOLUTIZE_CSS_PATHS: &str = "absolutize-css-paths";
pub const ABSOLUTIZE_HTML_PATHS: &str = "absolutize-html-paths";
pub const WRAP_TEXT_AS_MODULE: &str = "wrap-text-as-module";

/// Relative run order of the built-in processors.
///
/// Transport wrapping sees unminified sources, and images are inlined
/// before stylesheets are minified and their remaining urls rewritten.
pub const DEFAULT_ORDER: [&str; 9] = [
    TRANSPORT_WRAP_JS,
    MINIFY_JS,
    VENDOR_PREFIX_CSS,
    INLINE_DATA_IMAGES,
    INLINE_CSS_IMPORTS,
    MINIFY_CSS,
    ABSOLUTIZE_CSS_PATHS,
    ABSOLUTIZE_HTML_PATHS,
    WRAP_TEXT_AS_MODULE,
];

// Patterns shared by the built-ins. Sources are literals, so compiling
// them cannot fail.
static JS_FILES: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"\.js$").unwrap());
static MIN_JS_FILES: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"\.min\.js$").unwrap());
static CSS_FILES: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"\.css$").unwrap());
static MIN_CSS_FILES: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"\.min\.css$").unwrap());
static HTML_FILES: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"\.html?$").unwrap());
static TEXT_FILES: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"\.(html|htm|txt|tpl|mustache)$").unwrap());

// ============================================================================
// Processor contract
// ============================================================================

/// Read-only view of the pipeline handed to each processor run.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Pipeline root.
    pub root: &'a Path,
    /// Current file set, as left by earlier stages.
    pub files: &'a FileSet,
}

/// A named content transform.
pub trait Processor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Default options; `pattern` decides which keys the processor sees.
    fn defaults(&self) -> ProcessorOptions;

    /// Transform one entry's text.
    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &crate::EntryKey,
        text: &str,
        options: &ProcessorOptions,
    ) -> anyhow::Result<String>;
}

// ============================================================================
// Options
// ============================================================================

/// Options of one processor: key gating plus free-form settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorOptions {
    pub pattern: Pattern,
    pub filter: Option<Pattern>,
    pub extra: toml::Table,
}

impl ProcessorOptions {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            filter: None,
            extra: toml::Table::new(),
        }
    }

    pub fn with_filter(mut self, filter: Pattern) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Key matches `pattern` and not `filter`.
    #[inline]
    pub fn applies_to(&self, key: &str) -> bool {
        self.pattern.is_match(key) && self.filter.as_ref().is_none_or(|f| !f.is_match(key))
    }

    /// Layer caller options on top of these, key by key.
    ///
    /// `pattern` and `filter` are compiled from strings; an empty `filter`
    /// string removes the default filter.
    pub fn merged(&self, overrides: Option<&toml::Table>) -> Result<Self, ConfigError> {
        let mut merged = self.clone();
        let Some(overrides) = overrides else {
            return Ok(merged);
        };

        for (key, value) in overrides {
            match (key.as_str(), value) {
                ("pattern", toml::Value::String(src)) => {
                    merged.pattern = compile(src, FieldPath::new("process.pattern"))?;
                }
                ("filter", toml::Value::String(src)) if src.is_empty() => {
                    merged.filter = None;
                }
                ("filter", toml::Value::String(src)) => {
                    merged.filter = Some(compile(src, FieldPath::new("process.filter"))?);
                }
                ("pattern" | "filter", _) => {
                    return Err(ConfigError::validation(
                        FieldPath::new("process"),
                        format!("`{key}` must be a string"),
                    ));
                }
                _ => {
                    merged.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(merged)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(toml::Value::as_str)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.extra.get(key).and_then(toml::Value::as_integer)
    }
}

fn compile(src: &str, field: FieldPath) -> Result<Pattern, ConfigError> {
    Pattern::new(src).map_err(|source| ConfigError::Pattern { field, source })
}

// ============================================================================
// Registry
// ============================================================================

/// Processor implementations keyed by name.
#[derive(Default)]
pub struct Registry {
    processors: FxHashMap<&'static str, Box<dyn Processor>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in processor.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(TransportWrapJs)
            .register(MinifyJs)
            .register(VendorPrefixCss)
            .register(InlineDataImages)
            .register(InlineCssImports)
            .register(MinifyCss)
            .register(AbsolutizeCssPaths)
            .register(AbsolutizeHtmlPaths)
            .register(WrapTextAsModule);
        registry
    }

    /// Register a processor, replacing any previous one with the same name.
    pub fn register(&mut self, processor: impl Processor + 'static) -> &mut Self {
        self.processors.insert(processor.name(), Box::new(processor));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Processor> {
        self.processors.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.processors.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("processors", &names).finish()
    }
}

/// Module id of a key: its root-relative path with `/` separators.
pub(crate) fn module_id(ctx: &ProcessContext<'_>, key: &crate::EntryKey) -> String {
    crate::utils::path::to_slash(&key.output_path(ctx.root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registers_default_order() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), DEFAULT_ORDER.len());
        for name in DEFAULT_ORDER {
            assert_eq!(registry.get(name).map(|p| p.name()), Some(name));
        }
        assert!(registry.get("minify-html").is_none());
    }

    #[test]
    fn test_applies_to_pattern_and_filter() {
        let options = ProcessorOptions::new(JS_FILES.clone()).with_filter(MIN_JS_FILES.clone());
        assert!(options.applies_to("/src/app.js"));
        assert!(!options.applies_to("/src/app.min.js"));
        assert!(!options.applies_to("/src/app.css"));
    }

    #[test]
    fn test_merged_overrides_key_by_key() {
        let defaults = ProcessorOptions::new(CSS_FILES.clone())
            .with("max-size", 4096)
            .with("prefix", "");
        let overrides: toml::Table = toml::from_str(
            r#"
            max-size = 1024
            filter = 'vendor/'
            "#,
        )
        .unwrap();

        let merged = defaults.merged(Some(&overrides)).unwrap();
        assert_eq!(merged.get_integer("max-size"), Some(1024));
        assert_eq!(merged.get_str("prefix"), Some(""));
        assert!(!merged.applies_to("/src/vendor/reset.css"));
        assert!(merged.applies_to("/src/site.css"));
        assert_eq!(defaults.get_integer("max-size"), Some(4096));
    }

    #[test]
    fn test_merged_empty_filter_clears_default() {
        let defaults = ProcessorOptions::new(JS_FILES.clone()).with_filter(MIN_JS_FILES.clone());
        let overrides: toml::Table = toml::from_str("filter = ''").unwrap();
        let merged = defaults.merged(Some(&overrides)).unwrap();
        assert!(merged.applies_to("/src/app.min.js"));
    }

    #[test]
    fn test_merged_rejects_bad_pattern() {
        let defaults = ProcessorOptions::new(JS_FILES.clone());
        let overrides: toml::Table = toml::from_str("pattern = '('").unwrap();
        assert!(matches!(
            defaults.merged(Some(&overrides)),
            Err(ConfigError::Pattern { .. })
        ));

        let overrides: toml::Table = toml::from_str("pattern = 3").unwrap();
        assert!(matches!(
            defaults.merged(Some(&overrides)),
            Err(ConfigError::Validation { .. })
        ));
    }
}
