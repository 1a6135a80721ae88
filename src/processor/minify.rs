//! Minifier processors for JS and CSS.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both are opaque to
//! the pipeline; a syntax error in source content is a `ProcessError`
//! that aborts the enclosing build attempt.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{ProcessError, ResourceProcessor};
use crate::model::Resource;

// ============================================================================
// JsMin
// ============================================================================

/// JavaScript minifier (`js_min`).
pub struct JsMin;

impl JsMin {
    fn minify(&self, source: &str) -> Result<String, ProcessError> {
        let allocator = Allocator::default();
        let source_type = SourceType::mjs();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if let Some(error) = ret.errors.first() {
            return Err(ProcessError::Rejected {
                processor: self.name().to_string(),
                message: error.to_string(),
            });
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
}

impl ResourceProcessor for JsMin {
    fn name(&self) -> &str {
        "js_min"
    }

    fn process(&self, _resource: Option<&Resource>, input: &str) -> Result<String, ProcessError> {
        self.minify(input)
    }
}

// ============================================================================
// CssMin
// ============================================================================

/// CSS minifier (`css_min`).
pub struct CssMin;

impl ResourceProcessor for CssMin {
    fn name(&self) -> &str {
        "css_min"
    }

    fn process(&self, _resource: Option<&Resource>, input: &str) -> Result<String, ProcessError> {
        let rejected = |message: String| ProcessError::Rejected {
            processor: "css_min".to_string(),
            message,
        };
        let stylesheet = StyleSheet::parse(input, ParserOptions::default())
            .map_err(|e| rejected(e.to_string()))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| rejected(e.to_string()))?;
        Ok(result.code)
    }
}

// ============================================================================
// tests
// ============================================================================
