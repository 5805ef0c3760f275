//! Template extraction, sub-parser adaptation and AST splicing.
//!
//! The pipeline for one document:
//!
//! 1. [`extract`] replaces every `<template>` region with a same-length
//!    placeholder the script grammar accepts.
//! 2. The caller parses the transformed text with a script grammar.
//! 3. [`splice`] parses each region through a [`TemplateAdapter`] and swaps
//!    it in for its placeholder, merging tokens, visitor keys and scopes.
//!
//! [`rewrite_import_specifiers`] is the separate length-preserving rewrite
//! used when a host compiler resolves modules.

mod adapter;
mod bind;
mod extract;
mod imports;
mod splice;

pub use adapter::{ParsedRegion, TemplateAdapter, TEMPLATE_NODE_PREFIX};
pub use bind::{bind_template, is_builtin_tag};
pub use extract::{
    extract, is_dual_syntax_path, placeholder, RegionKind, SourceDocument, TemplateRegion,
    TransformedSource,
};
pub use imports::{rewrite_import_specifiers, RewriteError};
pub use splice::{splice, UnifiedAst};
