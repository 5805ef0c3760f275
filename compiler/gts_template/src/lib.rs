//! Template sub-parser for the hybrid lint parser.
//!
//! Parses the text of one `<template>...</template>` region into a Glimmer
//! tree rooted at a `Template` node whose single body entry is the
//! `template` element itself. Node type names are unprefixed here; the
//! bridge adds the `Glimmer` prefix when splicing.
//!
//! Offsets in the output are local to the region text.

mod keys;
mod parser;

pub use keys::template_visitor_keys;

use gts_diagnostic::ParseError;
use gts_ir::{Ast, NodeId, Token, VisitorKeys};
use tracing::debug;

/// Result of parsing one template region.
#[derive(Clone, Debug)]
pub struct TemplateOutput {
    pub ast: Ast,
    /// The `Template` node.
    pub root: NodeId,
    /// Template tokens, sorted by start offset.
    pub tokens: Vec<Token>,
}

/// Interface to a template grammar.
pub trait TemplateParser {
    fn parse(&self, text: &str) -> Result<TemplateOutput, ParseError>;

    fn visitor_keys(&self) -> &VisitorKeys;
}

/// The bundled Glimmer template parser.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlimmerParser;

impl GlimmerParser {
    pub fn new() -> Self {
        GlimmerParser
    }
}

impl TemplateParser for GlimmerParser {
    fn parse(&self, text: &str) -> Result<TemplateOutput, ParseError> {
        let (ast, root, tokens) = parser::Parser::new(text).parse()?;
        debug!(nodes = ast.len(), tokens = tokens.len(), "parsed template region");
        Ok(TemplateOutput { ast, root, tokens })
    }

    fn visitor_keys(&self) -> &VisitorKeys {
        template_visitor_keys()
    }
}
