//! Regex-vs-division disambiguation.
//!
//! A `/` starts a regular-expression literal when the previous significant
//! token cannot end an expression. This is the usual one-token-lookbehind
//! heuristic; it misreads only pathological code such as a regex directly
//! after a `}` that closes an object literal.

/// Classification of the previous significant token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrevToken {
    /// Start of input.
    Start,
    /// Keyword after which an expression begins (`return`, `typeof`, ...).
    ExprKeyword,
    /// Any other identifier or keyword.
    Word,
    /// A punctuator, by its last byte.
    Punct(u8),
    /// String, number, template or regex literal.
    Literal,
}

const EXPR_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await", "extends",
];

impl PrevToken {
    /// Classify an identifier-like word.
    pub fn word(text: &str) -> Self {
        if EXPR_KEYWORDS.contains(&text) {
            PrevToken::ExprKeyword
        } else {
            PrevToken::Word
        }
    }
}

/// Whether a `/` after `prev` starts a regex literal.
pub fn regex_allowed(prev: PrevToken) -> bool {
    match prev {
        PrevToken::Start | PrevToken::ExprKeyword => true,
        PrevToken::Word | PrevToken::Literal => false,
        PrevToken::Punct(b) => !matches!(b, b')' | b']'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_after_operands() {
        assert!(!regex_allowed(PrevToken::word("total")));
        assert!(!regex_allowed(PrevToken::Literal));
        assert!(!regex_allowed(PrevToken::Punct(b')')));
        assert!(!regex_allowed(PrevToken::Punct(b']')));
    }

    #[test]
    fn regex_after_operators_and_keywords() {
        assert!(regex_allowed(PrevToken::Start));
        assert!(regex_allowed(PrevToken::Punct(b'=')));
        assert!(regex_allowed(PrevToken::Punct(b'(')));
        assert!(regex_allowed(PrevToken::word("return")));
    }
}
