//! The immutable, directed, vertex- and edge-labeled graph model (component
//! C1) the search operates over.
//!
//! Vertices and edges are lightweight ids, essentially `usize`; algorithm
//! code is free to copy and store them. A [`SchemaGraph`] answers adjacency
//! queries in O(deg) and exposes no mutation once built.

mod vertex;
pub use self::vertex::*;
mod edge;
pub use self::edge::*;
mod schema_graph;
pub use self::schema_graph::*;
