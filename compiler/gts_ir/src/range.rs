//! Offset-preserving text replacement.
//!
//! Every downstream offset in the pipeline refers to the original document.
//! Replacements that feed a parser must therefore keep the byte length of the
//! replaced range unchanged; [`replace_range_preserving`] enforces that, while
//! [`replace_range`] is the unchecked primitive.

use thiserror::Error;

/// A length-preserving replacement was asked to change the text length.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("replacement for {start}..{end} is {actual} bytes, expected {expected}")]
pub struct LengthMismatch {
    pub start: usize,
    pub end: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Replace `text[start..end]` with `replacement`.
///
/// # Panics
/// Panics if `start > end`, `end > text.len()`, or either index is not on a
/// char boundary. These are caller bugs, not input errors.
pub fn replace_range(text: &str, start: usize, end: usize, replacement: &str) -> String {
    assert!(
        start <= end && end <= text.len(),
        "replace_range {start}..{end} out of bounds for text of {} bytes",
        text.len()
    );
    let mut out = String::with_capacity(text.len() - (end - start) + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    out
}

/// Replace `text[start..end]` with a replacement of the same byte length.
pub fn replace_range_preserving(
    text: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> Result<String, LengthMismatch> {
    if replacement.len() != end.saturating_sub(start) {
        return Err(LengthMismatch {
            start,
            end,
            expected: end.saturating_sub(start),
            actual: replacement.len(),
        });
    }
    let out = replace_range(text, start, end, replacement);
    debug_assert_eq!(out.len(), text.len());
    Ok(out)
}

/// Blank out `text`, keeping line terminators in place.
///
/// Every byte that is not `\n` or `\r` becomes a space, so a multi-byte
/// character turns into as many spaces as it had bytes. The result has the
/// same byte length and the same line structure as the input.
pub fn blank_preserving_lines(text: &str) -> String {
    text.bytes()
        .map(|b| match b {
            b'\n' => '\n',
            b'\r' => '\r',
            _ => ' ',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_range_changes_length() {
        assert_eq!(replace_range("hello world", 6, 11, "there!"), "hello there!");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn replace_range_out_of_bounds_is_fatal() {
        let _ = replace_range("abc", 2, 10, "x");
    }

    #[test]
    fn preserving_accepts_same_length() {
        let out = replace_range_preserving("import a from './a.gts';", 15, 22, "./a.mts");
        assert_eq!(out.as_deref(), Ok("import a from './a.mts';"));
    }

    #[test]
    fn preserving_rejects_length_change() {
        let err = replace_range_preserving("abcdef", 1, 3, "xyz");
        assert_eq!(
            err,
            Err(LengthMismatch {
                start: 1,
                end: 3,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn blanking_keeps_lines_and_bytes() {
        let text = "<b>\n ❤️\r\n</b>";
        let blank = blank_preserving_lines(text);
        assert_eq!(blank.len(), text.len());
        assert_eq!(blank.matches('\n').count(), 2);
        assert_eq!(blank.find('\r'), text.find('\r'));
        assert!(blank.chars().all(|c| c == ' ' || c == '\n' || c == '\r'));
    }
}
