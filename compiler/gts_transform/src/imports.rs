//! Import-specifier rewriting.
//!
//! A host compiler resolving `import x from './a.gts'` only knows the
//! conventional extensions, so specifiers naming a dual-syntax module are
//! pointed at its virtual sibling: `.gts` becomes `.mts` and, when the
//! secondary extension is enabled, `.gjs` becomes `.mjs`. Both pairs have the
//! same length, so offsets never move.


use gts_diagnostic::ParseError;
use gts_ir::{replace_range_preserving, LengthMismatch};
use gts_script::{import_sources, EcmaParser, ScriptOptions, ScriptParser};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("cannot parse module: {0}")]
    Parse(#[from] ParseError),
    #[error("specifier rewrite changed the text length: {0}")]
    Length(#[from] LengthMismatch),
}

/// Rewrite the module specifier of every import declaration in `text`.
pub fn rewrite_import_specifiers(text: &str, allow_secondary: bool) -> Result<String, RewriteError> {
    let options = ScriptOptions {
        typed: EcmaParser::new().supports_typed(),
    };
    let sources = import_sources(text, options)?;

    let mut out = text.to_owned();
    for source in sources {
        let inner = source.inset(1);
        let Some(path) = inner.slice(text) else {
            continue;
        };
        let renamed = if let Some(stem) = path.strip_suffix(".gts") {
            format!("{stem}.mts")
        } else if let Some(stem) = path.strip_suffix(".gjs").filter(|_| allow_secondary) {
            format!("{stem}.mjs")
        } else {
            continue;
        };
        trace!(from = path, to = %renamed, "rewrote import specifier");
        out = replace_range_preserving(&out, inner.start as usize, inner.end as usize, &renamed)?;
    }
    Ok(out)
}
