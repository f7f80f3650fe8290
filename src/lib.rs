//! Exact graph edit distance between directed, vertex- and edge-labeled
//! graphs.
//!
//! The distance is found by an A* best-first branch-and-bound search
//! ([`search`]) guided by an admissible lower-bound estimator
//! ([`estimate`]) built on a Hungarian-assignment driver ([`assignment`])
//! that also enumerates k-best ("next-best child") assignments. The public
//! entry points are [`diff`] and [`diff_with_start`].

pub mod assignment;
pub mod editorial;
pub mod error;
pub mod estimate;
pub mod external;
pub mod graph;
pub mod mapping;
pub mod search;

mod diff;

pub use diff::{diff, diff_with_start};
pub use editorial::EditOperation;
pub use error::GedError;
pub use external::{AllowAll, NeverCancel, PossibleMappings, RunningCheck};
pub use graph::{Edge, EdgeId, SchemaGraph, SchemaGraphBuilder, Vertex, VertexId, VertexKind};
pub use mapping::Mapping;
pub use search::OptimalEdit;
