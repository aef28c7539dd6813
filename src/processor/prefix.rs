//! Vendor prefixing for stylesheets.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::{CSS_FILES, ProcessContext, Processor, ProcessorOptions, VENDOR_PREFIX_CSS};
use crate::EntryKey;

/// Option name and default major version of each supported browser.
const BROWSERS: [(&str, i64); 4] = [("chrome", 49), ("firefox", 45), ("safari", 9), ("ie", 11)];

pub struct VendorPrefixCss;

impl VendorPrefixCss {
    fn targets(options: &ProcessorOptions) -> Targets {
        // lightningcss packs versions as major << 16 | minor << 8 | patch
        let version = |name: &str| {
            options
                .get_integer(name)
                .and_then(|major| u32::try_from(major).ok())
                .filter(|major| *major > 0)
                .map(|major| major << 16)
        };
        Targets::from(Browsers {
            chrome: version("chrome"),
            firefox: version("firefox"),
            safari: version("safari"),
            ie: version("ie"),
            ..Browsers::default()
        })
    }
}

impl Processor for VendorPrefixCss {
    fn name(&self) -> &'static str {
        VENDOR_PREFIX_CSS
    }

    fn defaults(&self) -> ProcessorOptions {
        BROWSERS
            .into_iter()
            .fold(ProcessorOptions::new(CSS_FILES.clone()), |options, (name, major)| {
                options.with(name, major)
            })
    }

    fn run(
        &self,
        _ctx: &ProcessContext<'_>,
        _key: &EntryKey,
        text: &str,
        options: &ProcessorOptions,
    ) -> Result<String> {
        let targets = Self::targets(options);
        let mut stylesheet =
            StyleSheet::parse(text, ParserOptions::default()).map_err(|err| anyhow!("{err}"))?;
        stylesheet
            .minify(MinifyOptions {
                targets,
                ..MinifyOptions::default()
            })
            .map_err(|err| anyhow!("{err}"))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|err| anyhow!("{err}"))?;
        Ok(result.code)
    }
}
