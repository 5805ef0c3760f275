//! Lint-parser entry point for modules that mix script and `<template>`
//! markup.
//!
//! [`parse_for_lint`] runs the whole pipeline for one document:
//!
//! 1. activate the file-system shim (once per process);
//! 2. swap every `<template>` region for a same-length placeholder;
//! 3. parse the result with the typed or untyped script grammar;
//! 4. when regions were found, parse each with the template grammar and
//!    splice the trees into the script tree.
//!
//! The result carries the merged tree, tokens, visitor keys and scopes in
//! document coordinates. A document without regions comes back exactly as
//! the script grammar produced it.

mod options;


use std::borrow::Cow;
use std::fmt;
use std::sync::Once;

use gts_ir::{Ast, Comment, NodeId, ParentIndex, ScopeManager, Token, VisitorKeys};
use gts_script::{EcmaParser, ScriptOptions, ScriptParser};
use gts_template::{GlimmerParser, TemplateParser};
use gts_transform::{extract, rewrite_import_specifiers, splice, RewriteError, TemplateAdapter, UnifiedAst};
use gts_vfs::{sync_virtual_files, ShimOptions, ShimState};
use tracing::{debug, trace};

pub use gts_diagnostic::{ConfigWarning, ErrorKind, ParseError};
pub use options::{ParserOptions, SharedProgram};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=gts_transform=trace,gts_vfs=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Services handed back when a host-compiler program was supplied.
#[derive(Clone)]
pub struct ParserServices {
    pub program: SharedProgram,
}

impl fmt::Debug for ParserServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserServices").finish_non_exhaustive()
    }
}

/// Everything a lint engine needs from one parse.
#[derive(Clone, Debug)]
pub struct ParseForLintResult {
    pub ast: Ast,
    /// The `Program` node; its range covers the whole document.
    pub root: NodeId,
    /// Script and template tokens, sorted by start offset.
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub visitor_keys: VisitorKeys,
    pub scope_manager: ScopeManager,
    pub parents: ParentIndex,
    pub services: Option<ParserServices>,
    /// Whether the typed grammar parsed the document.
    pub is_typescript: bool,
}

impl ParseForLintResult {
    fn new(unified: UnifiedAst, services: Option<ParserServices>, is_typescript: bool) -> Self {
        let UnifiedAst {
            ast,
            root,
            tokens,
            comments,
            visitor_keys,
            scope_manager,
            parents,
        } = unified;
        ParseForLintResult {
            ast,
            root,
            tokens,
            comments,
            visitor_keys,
            scope_manager,
            parents,
            services,
            is_typescript,
        }
    }
}

/// Parse `code` with the bundled script and template grammars.
#[tracing::instrument(level = "debug", skip_all, fields(path = ?options.file_path))]
pub fn parse_for_lint(code: &str, options: &ParserOptions) -> Result<ParseForLintResult, ParseError> {
    parse_with(code, options, &EcmaParser::new(), &GlimmerParser::new())
}

/// Parse `code` with the given grammars.
///
/// Errors carry the options' file path as their file name.
pub fn parse_with(
    code: &str,
    options: &ParserOptions,
    script: &dyn ScriptParser,
    template: &dyn TemplateParser,
) -> Result<ParseForLintResult, ParseError> {
    run(code, options, script, template).map_err(|e| match options.file_path() {
        Some(path) => e.with_file_name(path.display().to_string()),
        None => e,
    })
}

fn run(
    code: &str,
    options: &ParserOptions,
    script: &dyn ScriptParser,
    template: &dyn TemplateParser,
) -> Result<ParseForLintResult, ParseError> {
    let shim = ShimState::activate(
        &ShimOptions {
            allow_secondary: options.allow_secondary,
        },
        options.program(),
        options.project.as_deref(),
    );

    let source = extract(code, options.file_path())?;
    let grammar = select_grammar(options, script)?;
    let text = match options.project {
        Some(_) => rewrite_imports(&source.text, shim.allow_secondary())?,
        None => Cow::Borrowed(source.text.as_str()),
    };

    let output = script.parse_module(&text, grammar)?;
    let unified = if source.has_regions() {
        let adapter = TemplateAdapter::new(template, script, grammar);
        splice(output, &source, code, &adapter)?
    } else {
        UnifiedAst::from_script(output)
    };

    let services = match &options.program {
        Some(program) if grammar.typed => {
            sync_virtual_files(&**program);
            Some(ParserServices {
                program: program.clone(),
            })
        }
        _ => None,
    };

    debug!(
        regions = source.regions.len(),
        tokens = unified.tokens.len(),
        typed = grammar.typed,
        "parsed for lint"
    );
    Ok(ParseForLintResult::new(unified, services, grammar.typed))
}

/// Pick the script grammar for `options`.
///
/// Typed-only extensions always get the typed grammar. Other files get it
/// whenever it is available, unless the alternate grammar was requested.
fn select_grammar(options: &ParserOptions, script: &dyn ScriptParser) -> Result<ScriptOptions, ParseError> {
    let typed_path = options.is_typed_path();
    if typed_path && !script.supports_typed() {
        let path = options.file_path().map(|p| p.display().to_string()).unwrap_or_default();
        return Err(ParseError::internal(format!("typed grammar required to parse {path}")));
    }
    let typed = typed_path || (!options.use_alternate_script_grammar && script.supports_typed());
    Ok(ScriptOptions { typed })
}

fn rewrite_imports(text: &str, allow_secondary: bool) -> Result<Cow<'_, str>, ParseError> {
    match rewrite_import_specifiers(text, allow_secondary) {
        Ok(rewritten) => Ok(Cow::Owned(rewritten)),
        // left for the script grammar to report
        Err(RewriteError::Parse(e)) => {
            trace!(error = %e, "skipping import rewriting");
            Ok(Cow::Borrowed(text))
        }
        Err(RewriteError::Length(e)) => Err(ParseError::internal(format!("import rewriting: {e}"))),
    }
}
