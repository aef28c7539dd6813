//! Module transport wrappers.
//!
//! Both processors emit the same AMD-like envelope:
//!
//! ```text
//! require.def("<id>", function transport(require, exports, module){ <body> });
//! ```

use super::{
    JS_FILES, MIN_JS_FILES, ProcessContext, Processor, ProcessorOptions, TEXT_FILES,
    TRANSPORT_WRAP_JS, WRAP_TEXT_AS_MODULE, module_id,
};
use crate::EntryKey;

/// Wrap `body` in the transport envelope registered under `id`.
pub fn transport(id: &str, body: &str) -> String {
    format!(r#"require.def("{id}", function transport(require, exports, module){{ {body} }});"#)
}

/// Wraps JavaScript sources so they register under their root-relative id.
pub struct TransportWrapJs;

impl Processor for TransportWrapJs {
    fn name(&self) -> &'static str {
        TRANSPORT_WRAP_JS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(JS_FILES.clone()).with_filter(MIN_JS_FILES.clone())
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        _options: &ProcessorOptions,
    ) -> anyhow::Result<String> {
        let id = module_id(ctx, key);
        let id = id.strip_suffix(".js").unwrap_or(&id);
        Ok(transport(id, text.trim_end()))
    }
}

/// Turns text templates into modules exporting their content as a string.
pub struct WrapTextAsModule;

impl Processor for WrapTextAsModule {
    fn name(&self) -> &'static str {
        WRAP_TEXT_AS_MODULE
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(TEXT_FILES.clone())
    }

    fn run(
        &self,
        ctx: &ProcessContext<'_>,
        key: &EntryKey,
        text: &str,
        _options: &ProcessorOptions,
    ) -> anyhow::Result<String> {
        let literal = serde_json::to_string(text)?;
        let body = format!("module.exports = {literal};");
        Ok(transport(&module_id(ctx, key), &body))
    }
}
