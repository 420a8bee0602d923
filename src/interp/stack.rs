//! Native stack growth for recursive evaluation
//!
//! Evaluation recurses once per tree level, so a deeply nested expression can
//! exhaust the thread's stack long before `max_call_depth` is reached.

/// Grow the stack when less than this remains
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
