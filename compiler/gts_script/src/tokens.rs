//! ESTree token list from swc's lexer.
//!
//! swc's lexer gives token spans only; kinds come from the first bytes of
//! each token's text. Tokens whose shape the lexer cannot know on its own
//! are taken from the lowered tree instead: template pieces, regular
//! expressions and private names replace whatever swc lexed inside them,
//! and `>>`-style punctuators are split where a type argument list closes.

use gts_ir::{LineIndex, ScriptTokenKind, Span, Token};
use gts_lexer_core::is_ident_start;

/// Reserved words reported as `Keyword` tokens.
const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var",
    "void", "while", "with", "yield",
];

/// Token ranges recorded while lowering the tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct TokenHints {
    /// `TemplateElement` ranges, delimiters included.
    pub templates: Vec<Span>,
    pub regexes: Vec<Span>,
    /// `#name` ranges with the name sans `#`.
    pub private_names: Vec<(Span, String)>,
    /// Offsets of `>` characters closing type parameter lists.
    pub type_closers: Vec<u32>,
}

fn classify(raw: &str) -> ScriptTokenKind {
    let bytes = raw.as_bytes();
    match bytes.first().copied().unwrap_or_default() {
        b'"' | b'\'' => ScriptTokenKind::String,
        b'0'..=b'9' => ScriptTokenKind::Numeric,
        b'.' if bytes.get(1).is_some_and(u8::is_ascii_digit) => ScriptTokenKind::Numeric,
        b'`' => ScriptTokenKind::Template,
        b if is_ident_start(b) || b == b'\\' || !b.is_ascii() => match raw {
            "true" | "false" => ScriptTokenKind::Boolean,
            "null" => ScriptTokenKind::Null,
            word if KEYWORDS.contains(&word) => ScriptTokenKind::Keyword,
            _ => ScriptTokenKind::Identifier,
        },
        _ => ScriptTokenKind::Punctuator,
    }
}

/// Merge swc's token spans with the tree-owned ranges in `hints`.
pub(crate) fn collect_tokens(text: &str, lines: &LineIndex, spans: Vec<Span>, hints: TokenHints) -> Vec<Token> {
    let TokenHints {
        templates,
        regexes,
        private_names,
        mut type_closers,
    } = hints;
    type_closers.sort_unstable();

    let slice = |range: Span| range.slice(text).unwrap_or_default();
    let mut owned: Vec<Token> = Vec::with_capacity(templates.len() + regexes.len() + private_names.len());
    owned.extend(
        templates
            .into_iter()
            .map(|range| Token::script(ScriptTokenKind::Template, slice(range), range)),
    );
    owned.extend(
        regexes
            .into_iter()
            .map(|range| Token::script(ScriptTokenKind::RegularExpression, slice(range), range)),
    );
    owned.extend(
        private_names
            .into_iter()
            .map(|(range, name)| Token::script(ScriptTokenKind::PrivateIdentifier, name, range)),
    );
    owned.sort_by_key(|token| token.range.start);

    let is_owned = |span: Span| {
        let at = owned.partition_point(|token| token.range.start <= span.start);
        at > 0 && owned[at - 1].range.contains_span(span)
    };

    let mut tokens = Vec::with_capacity(spans.len());
    for span in spans {
        if is_owned(span) {
            continue;
        }
        let raw = slice(span);
        let kind = classify(raw);
        if kind == ScriptTokenKind::Punctuator && raw.len() > 1 && raw.starts_with('>') {
            let first = type_closers.partition_point(|&at| at < span.start);
            let cuts = type_closers[first..].iter().take_while(|&&at| at < span.end);
            let mut start = span.start;
            for &cut in cuts {
                if cut > start {
                    let piece = Span::new(start, cut);
                    tokens.push(Token::script(kind, slice(piece), piece));
                }
                let closer = Span::new(cut, cut + 1);
                tokens.push(Token::script(kind, ">", closer));
                start = cut + 1;
            }
            if start < span.end {
                let rest = Span::new(start, span.end);
                tokens.push(Token::script(kind, slice(rest), rest));
            }
            continue;
        }
        tokens.push(Token::script(kind, raw, span));
    }

    tokens.extend(owned);
    tokens.sort_by_key(|token| token.range.start);
    for token in &mut tokens {
        token.loc = lines.loc(token.range);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kinds_from_leading_bytes() {
        assert_eq!(classify("'a'"), ScriptTokenKind::String);
        assert_eq!(classify(".5"), ScriptTokenKind::Numeric);
        assert_eq!(classify("."), ScriptTokenKind::Punctuator);
        assert_eq!(classify("null"), ScriptTokenKind::Null);
        assert_eq!(classify("false"), ScriptTokenKind::Boolean);
        assert_eq!(classify("typeof"), ScriptTokenKind::Keyword);
        assert_eq!(classify("let"), ScriptTokenKind::Identifier);
        assert_eq!(classify("$el"), ScriptTokenKind::Identifier);
    }

    #[test]
    fn shift_operator_splits_at_type_closers() {
        let text = "a<b<c>>";
        let lines = LineIndex::new(text);
        let spans = vec![
            Span::new(0, 1),
            Span::new(1, 2),
            Span::new(2, 3),
            Span::new(3, 4),
            Span::new(4, 5),
            Span::new(5, 7),
        ];
        let hints = TokenHints {
            type_closers: vec![6, 5],
            ..TokenHints::default()
        };
        let values: Vec<_> = collect_tokens(text, &lines, spans, hints)
            .into_iter()
            .map(|token| token.value)
            .collect();
        assert_eq!(values, ["a", "<", "b", "<", "c", ">", ">"]);
    }

    #[test]
    fn owned_ranges_replace_lexed_tokens() {
        let text = "x = /a b/g";
        let lines = LineIndex::new(text);
        let spans = vec![Span::new(0, 1), Span::new(2, 3), Span::new(4, 5), Span::new(5, 6), Span::new(7, 10)];
        let hints = TokenHints {
            regexes: vec![Span::new(4, 10)],
            ..TokenHints::default()
        };
        let tokens = collect_tokens(text, &lines, spans, hints);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, gts_ir::TokenKind::Script(ScriptTokenKind::RegularExpression));
        assert_eq!(tokens[2].value, "/a b/g");
    }
}
