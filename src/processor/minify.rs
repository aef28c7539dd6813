//! JavaScript and CSS minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use anyhow::{Result, anyhow, bail};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{
    CSS_FILES, JS_FILES, MIN_CSS_FILES, MIN_JS_FILES, MINIFY_CSS, MINIFY_JS, ProcessContext,
    Processor, ProcessorOptions,
};
use crate::EntryKey;

/// Minify JavaScript source code.
///
/// Sources are parsed as scripts so top-level names stay untouched.
pub fn minify_js(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !ret.errors.is_empty() {
        bail!("{:?}", ret.errors);
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String> {
    let mut stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|err| anyhow!("{err}"))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|err| anyhow!("{err}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| anyhow!("{err}"))?;
    Ok(result.code)
}

pub struct MinifyJs;

impl Processor for MinifyJs {
    fn name(&self) -> &'static str {
        MINIFY_JS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(JS_FILES.clone()).with_filter(MIN_JS_FILES.clone())
    }

    fn run(
        &self,
        _ctx: &ProcessContext<'_>,
        _key: &EntryKey,
        text: &str,
        _options: &ProcessorOptions,
    ) -> Result<String> {
        minify_js(text)
    }
}

pub struct MinifyCss;

impl Processor for MinifyCss {
    fn name(&self) -> &'static str {
        MINIFY_CSS
    }

    fn defaults(&self) -> ProcessorOptions {
        ProcessorOptions::new(CSS_FILES.clone()).with_filter(MIN_CSS_FILES.clone())
    }

    fn run(
        &self,
        _ctx: &ProcessContext<'_>,
        _key: &EntryKey,
        text: &str,
        _options: &ProcessorOptions,
    ) -> Result<String> {
        minify_css(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js_shrinks() {
        let source = "function add(first, second) {\n    // sum\n    return first + second;\n}\n";
        let minified = minify_js(source).unwrap();
        assert!(minified.len() < source.len());
        assert!(!minified.contains("// sum"));
        assert!(minified.contains("function add"));
    }

    #[test]
    fn test_minify_js_syntax_error() {
        assert!(minify_js("function (").is_err());
    }

    #[test]
    fn test_minify_css() {
        let minified = minify_css("body {\n    color: #ff0000;\n    margin: 0px;\n}\n").unwrap();
        assert_eq!(minified, "body{color:red;margin:0}");
    }

    #[test]
    fn test_defaults_skip_already_minified() {
        assert!(!MinifyJs.defaults().applies_to("/lib/jquery.min.js"));
        assert!(!MinifyCss.defaults().applies_to("/css/reset.min.css"));
        assert!(MinifyCss.defaults().applies_to("/css/site.css"));
    }
}
