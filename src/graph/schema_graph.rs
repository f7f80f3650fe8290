use super::{Edge, EdgeId, Vertex, VertexId, VertexKind};
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
    Direction,
};

/// An immutable directed, vertex- and edge-labeled graph.
///
/// Backed by `petgraph::graph::DiGraph`, in the same spirit as the
/// `PetgraphBackedGraph` low-level digraph: vertices and edges are
/// lightweight ids, adjacency queries are O(deg), and there is no mutation
/// surface once [`SchemaGraphBuilder::build`] has produced the graph.
#[derive(Clone)]
pub struct SchemaGraph {
    inner: DiGraph<Vertex, Option<String>, usize>,
}

impl SchemaGraph {
    pub fn size(&self) -> usize {
        self.inner.node_count()
    }

    pub fn vertex_at(&self, i: usize) -> VertexId {
        VertexId::new(i)
    }

    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.inner[NodeIndex::new(v.to_raw())]
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices().map(|n| VertexId::new(n.index()))
    }

    /// Out-edges of `v`, in O(deg).
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        let n = NodeIndex::new(v.to_raw());
        self.inner
            .edges_directed(n, Direction::Outgoing)
            .map(|e| self.edge_from_ref(e.id(), e.source(), e.target()))
    }

    /// In-edges of `v`, in O(deg).
    pub fn in_edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        let n = NodeIndex::new(v.to_raw());
        self.inner
            .edges_directed(n, Direction::Incoming)
            .map(|e| self.edge_from_ref(e.id(), e.source(), e.target()))
    }

    pub fn edge_between(&self, source: VertexId, sink: VertexId) -> Option<Edge> {
        let a = NodeIndex::new(source.to_raw());
        let b = NodeIndex::new(sink.to_raw());
        self.inner
            .find_edge(a, b)
            .map(|eidx| self.edge_from_ref(eidx, a, b))
    }

    fn edge_from_ref(&self, eidx: EdgeIndex<usize>, a: NodeIndex<usize>, b: NodeIndex<usize>) -> Edge {
        Edge {
            id: EdgeId::new(eidx.index()),
            source: VertexId::new(a.index()),
            sink: VertexId::new(b.index()),
            label: self.inner[eidx].clone(),
        }
    }
}

/// Builds a [`SchemaGraph`]. Once built the graph exposes no further
/// mutation: the search only ever reads graphs.
#[derive(Clone, Default)]
pub struct SchemaGraphBuilder {
    inner: DiGraph<Vertex, Option<String>, usize>,
}

impl SchemaGraphBuilder {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::with_capacity(0, 0),
        }
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        VertexId::new(self.inner.add_node(vertex).index())
    }

    pub fn add_edge(&mut self, source: VertexId, sink: VertexId, label: Option<String>) -> EdgeId {
        let a = NodeIndex::new(source.to_raw());
        let b = NodeIndex::new(sink.to_raw());
        EdgeId::new(self.inner.add_edge(a, b, label).index())
    }

    /// Appends `ISOLATED` slack vertices until the graph has exactly `n`
    /// vertices. No-op if the graph already has `n` or more vertices.
    pub fn pad_to(&mut self, n: usize) {
        while self.inner.node_count() < n {
            self.add_vertex(Vertex::new(VertexKind::Isolated));
        }
    }

    pub fn build(self) -> SchemaGraph {
        SchemaGraph { inner: self.inner }
    }
}
