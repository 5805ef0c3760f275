//! Stack growth for recursive descent over untrusted input.
//!
//! Script conversion, scope analysis, template parsing and template
//! binding all recurse once per nesting level of the source. Deeply
//! nested input would otherwise abort the process with a stack overflow
//! instead of producing an AST or a `ParseError`.
//!
//! Native targets grow the stack through `stacker`; wasm32 calls the
//! closure directly.

/// Remaining stack below which a recursive step switches to a new segment.
const RED_ZONE: usize = 128 * 1024;

/// Size of each segment allocated by [`ensure_sufficient_stack`].
const SEGMENT: usize = 2 * 1024 * 1024;

/// Remaining stack below which [`with_parse_stack`] switches segments.
const PARSE_RED_ZONE: usize = 64 * 1024 * 1024;

/// Segment size for a whole third-party parse, which recurses without
/// consulting [`ensure_sufficient_stack`].
const PARSE_SEGMENT: usize = 256 * 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment when little remains.
///
/// Wrap the body of every function that recurses per nesting level:
///
/// ```text
/// fn visit(&mut self, id: NodeId) {
///     ensure_sufficient_stack(|| self.visit_node(id));
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Runs `f` on a segment large enough for a full script parse.
///
/// Callers bound the nesting depth of the input beforehand; this only
/// guarantees the headroom that bound needs.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn with_parse_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(PARSE_RED_ZONE, PARSE_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_parse_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
