//! Ordered path rewrite rules.
//!
//! Module resolution tries each rule of a list in order and takes the first
//! candidate that exists on disk. A rule rewrites one path suffix; the
//! [`Rule::LITERAL`] rule yields the path unchanged.


use std::path::{Path, PathBuf};

/// A `(path) -> candidate` suffix rewrite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Suffixes tried in order; the first one the path ends with is replaced.
    from: &'static [&'static str],
    to: &'static str,
    /// Applies only when the secondary extension is enabled.
    secondary: bool,
    /// Never applies to declaration files.
    code_only: bool,
}

impl Rule {
    /// The path itself.
    pub const LITERAL: Rule = Rule::new(&[], "");

    const fn new(from: &'static [&'static str], to: &'static str) -> Self {
        Rule {
            from,
            to,
            secondary: false,
            code_only: false,
        }
    }

    const fn secondary(self) -> Self {
        Rule { secondary: true, ..self }
    }

    const fn code_only(self) -> Self {
        Rule { code_only: true, ..self }
    }

    /// Candidate for `path`, if the rule applies.
    pub fn apply(&self, path: &Path, allow_secondary: bool) -> Option<PathBuf> {
        if self.secondary && !allow_secondary {
            return None;
        }
        let text = path.to_str()?;
        if self.code_only && is_declaration(text) {
            return None;
        }
        if self.from.is_empty() {
            return Some(path.to_path_buf());
        }
        let stem = self.from.iter().find_map(|suffix| text.strip_suffix(suffix))?;
        Some(PathBuf::from(format!("{stem}{}", self.to)))
    }
}

/// Variant order for existence checks.
pub const EXISTS_RULES: &[Rule] = &[
    Rule::new(&[".mts", ".ts"], ".gts"),
    Rule::new(&[".mjs", ".js"], ".gjs").secondary(),
    Rule::new(&[".mts", ".ts"], ".gjs").secondary().code_only(),
    Rule::new(&[".mjs.d.ts"], ".gjs.d.ts").secondary(),
    Rule::new(&[".d.mts"], ".gjs.d.ts").secondary(),
    Rule::new(&[".d.mts"], ".d.gjs.ts").secondary(),
    Rule::LITERAL,
];

/// Variant order for reads. A dual-syntax source shadows a conventional file
/// of the same stem; declaration variants are a fallback for missing paths.
pub const READ_RULES: &[Rule] = &[
    Rule::new(&[".mts", ".ts"], ".gts").code_only(),
    Rule::new(&[".mjs", ".js"], ".gjs").secondary().code_only(),
    Rule::new(&[".mts", ".ts"], ".gjs").secondary().code_only(),
    Rule::LITERAL,
    Rule::new(&[".d.mts"], ".d.gjs.ts").secondary(),
    Rule::new(&[".d.mts"], ".gjs.d.ts").secondary(),
    Rule::new(&[".mjs.d.ts"], ".gjs.d.ts").secondary(),
];

/// Virtual siblings listed next to a dual-syntax file.
const SIBLING_RULES: &[Rule] = &[
    Rule::new(&[".gts"], ".mts"),
    Rule::new(&[".gjs"], ".mjs").secondary(),
    Rule::new(&[".gjs.d.ts"], ".mjs.d.ts").secondary(),
    Rule::new(&[".gjs.d.ts"], ".d.mts").secondary(),
    Rule::new(&[".d.gjs.ts"], ".d.mts").secondary(),
];

/// First candidate of `rules` accepted by `exists`.
pub fn resolve(
    rules: &[Rule],
    path: &Path,
    allow_secondary: bool,
    exists: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    rules
        .iter()
        .filter_map(|rule| rule.apply(path, allow_secondary))
        .find(|candidate| exists(candidate))
}

/// Virtual siblings for every dual-syntax file in `listing`, grouped by rule.
pub fn virtual_siblings(listing: &[PathBuf], allow_secondary: bool) -> Vec<PathBuf> {
    SIBLING_RULES
        .iter()
        .flat_map(|rule| listing.iter().filter_map(move |path| rule.apply(path, allow_secondary)))
        .collect()
}

/// `.d.ts`, `.d.mts` or `.d.cts`, including `.gjs.d.ts`.
pub fn is_declaration(path: &str) -> bool {
    [".d.ts", ".d.mts", ".d.cts"].iter().any(|s| path.ends_with(s))
}

/// Whether `path` names a dual-syntax source (not a declaration) the shim
/// transforms on read.
pub fn is_dual_syntax_source(path: &str, allow_secondary: bool) -> bool {
    !is_declaration(path) && (path.ends_with(".gts") || (allow_secondary && path.ends_with(".gjs")))
}
