//! Stack safety for deep recursion.
//!
//! The parser and the evaluator both recurse on the shape of the input, so a
//! deeply nested program could exhaust the thread stack long before the
//! interpreter's call-depth limit is reached. Recursive entry points run
//! through [`ensure_sufficient_stack`], which grows the stack on demand.

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
