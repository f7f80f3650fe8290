//! Error types for the graph edit distance search.

/// Failure modes of [`crate::diff`] and [`crate::diff_with_start`].
///
/// There are no recoverable errors produced by ordinary search progress:
/// infeasible vertex pairs are scored `+∞` and pruned, not reported as errors.
#[derive(Debug, thiserror::Error)]
pub enum GedError {
    /// Raised by [`crate::RunningCheck::check`]. The search is abandoned; no
    /// partial result is returned.
    #[error("graph edit distance search was cancelled")]
    Cancelled,
    /// An internal invariant was violated. This indicates a programming
    /// error in the crate itself, not malformed input.
    #[error("graph edit distance search invariant violated: {0}")]
    InvariantViolation(String),
}
