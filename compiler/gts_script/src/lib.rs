//! Script sub-parser for the hybrid lint parser.
//!
//! The bridge talks to the script grammar only through [`ScriptParser`].
//! [`EcmaParser`] is the bundled implementation: swc's ECMAScript parser,
//! with its TypeScript grammar behind the `typescript` feature, lowered into
//! an ESTree-shaped [`Ast`]. Scope analysis runs over the lowered tree.
//!
//! Ranges are absolute byte offsets into the parsed text, always.

mod convert;
mod keys;
mod parse;
mod scope;
mod tokens;

pub use keys::script_visitor_keys;
pub use parse::MAX_NESTING;
pub use scope::{analyze, analyze_island};

use gts_diagnostic::ParseError;
use gts_ir::{Ast, Comment, NodeId, ReferenceId, ScopeId, ScopeManager, Span, Token, VisitorKeys};
use tracing::debug;

/// Options passed to the script grammar.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Parse with type annotations.
    pub typed: bool,
}

impl ScriptOptions {
    pub fn typed() -> Self {
        ScriptOptions { typed: true }
    }

    pub fn untyped() -> Self {
        ScriptOptions { typed: false }
    }
}

/// Result of parsing a whole module.
#[derive(Clone, Debug)]
pub struct ScriptOutput {
    pub ast: Ast,
    /// The `Program` node.
    pub root: NodeId,
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub visitor_keys: VisitorKeys,
    pub scope_manager: ScopeManager,
}

/// Result of parsing a standalone expression.
#[derive(Clone, Debug)]
pub struct ExpressionOutput {
    pub ast: Ast,
    pub root: NodeId,
    pub tokens: Vec<Token>,
}

/// Interface to a script grammar.
pub trait ScriptParser {
    /// Whether the typed grammar is available.
    fn supports_typed(&self) -> bool;

    fn parse_module(&self, text: &str, options: ScriptOptions) -> Result<ScriptOutput, ParseError>;

    /// Parse `text` as exactly one expression.
    fn parse_expression(&self, text: &str, options: ScriptOptions) -> Result<ExpressionOutput, ParseError>;

    fn visitor_keys(&self) -> &VisitorKeys;

    /// Record references for an expression subtree already placed in `ast`,
    /// resolved from `scope`. Resolution is left to the caller.
    fn analyze_island(&self, ast: &Ast, root: NodeId, sm: &mut ScopeManager, scope: ScopeId) -> Vec<ReferenceId>;
}

/// The bundled ECMAScript/TypeScript parser.
#[derive(Copy, Clone, Debug, Default)]
pub struct EcmaParser;

impl EcmaParser {
    pub fn new() -> Self {
        EcmaParser
    }

    fn check_grammar(self, options: ScriptOptions) -> Result<(), ParseError> {
        if options.typed && !self.supports_typed() {
            return Err(ParseError::internal(
                "typed grammar required but the `typescript` feature is disabled",
            ));
        }
        Ok(())
    }
}

impl ScriptParser for EcmaParser {
    fn supports_typed(&self) -> bool {
        cfg!(feature = "typescript")
    }

    fn parse_module(&self, text: &str, options: ScriptOptions) -> Result<ScriptOutput, ParseError> {
        self.check_grammar(options)?;
        let parsed = parse::parse_module(text, options.typed)?;
        let scope_manager = analyze(&parsed.ast, parsed.root);
        debug!(
            nodes = parsed.ast.len(),
            tokens = parsed.tokens.len(),
            typed = options.typed,
            "parsed script module"
        );
        Ok(ScriptOutput {
            ast: parsed.ast,
            root: parsed.root,
            tokens: parsed.tokens,
            comments: parsed.comments,
            visitor_keys: script_visitor_keys().clone(),
            scope_manager,
        })
    }

    fn parse_expression(&self, text: &str, options: ScriptOptions) -> Result<ExpressionOutput, ParseError> {
        self.check_grammar(options)?;
        let parsed = parse::parse_expression(text, options.typed)?;
        Ok(ExpressionOutput {
            ast: parsed.ast,
            root: parsed.root,
            tokens: parsed.tokens,
        })
    }

    fn visitor_keys(&self) -> &VisitorKeys {
        script_visitor_keys()
    }

    fn analyze_island(&self, ast: &Ast, root: NodeId, sm: &mut ScopeManager, scope: ScopeId) -> Vec<ReferenceId> {
        analyze_island(ast, root, sm, scope)
    }
}

/// Ranges of the source strings of the top-level `import` declarations in
/// `text`, quotes included, in source order.
///
/// `export … from`, dynamic `import()` and `import.meta` are not import
/// declarations and are not reported.
pub fn import_sources(text: &str, options: ScriptOptions) -> Result<Vec<Span>, ParseError> {
    EcmaParser.check_grammar(options)?;
    parse::import_sources(text, options.typed)
}

#[cfg(test)]
mod tests;
