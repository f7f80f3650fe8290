//! Collaborator traits the search engine consumes, plus permissive default
//! implementations for tests and simple callers.

use crate::error::GedError;
use crate::graph::VertexId;

/// A hard constraint on which source vertex may map to which target vertex.
/// Infeasible pairs are not an error condition; they are scored `+∞` by the
/// estimator and pruned by the search.
pub trait PossibleMappings {
    fn mapping_possible(&self, v: VertexId, u: VertexId) -> bool;
}

/// A cooperative cancellation hook, polled once per main search-loop
/// iteration. Returning `Err` abandons the search entirely; the caller never
/// receives a partial result.
pub trait RunningCheck {
    fn check(&self) -> Result<(), GedError>;
}

/// A [`PossibleMappings`] that allows every pairing. Useful for tests and
/// for callers with no type-compatibility constraints to enforce.
pub struct AllowAll;

impl PossibleMappings for AllowAll {
    fn mapping_possible(&self, _v: VertexId, _u: VertexId) -> bool {
        true
    }
}

/// A [`RunningCheck`] that never cancels.
pub struct NeverCancel;

impl RunningCheck for NeverCancel {
    fn check(&self) -> Result<(), GedError> {
        Ok(())
    }
}
