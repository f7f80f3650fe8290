use std::collections::BTreeMap;

/// Identity of a vertex within a single [`super::SchemaGraph`].
///
/// Backed by a `petgraph` node index; essentially a `usize`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub(crate) fn new(x: usize) -> Self {
        Self(x)
    }

    pub fn to_raw(&self) -> usize {
        self.0
    }
}

/// The type tag of a vertex.
///
/// `Isolated` is the one distinguished kind reserved for slack vertices used
/// to pad the smaller of the two graphs so that source and target have equal
/// size and the search can treat the problem as a total bijection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexKind {
    Isolated,
    Named(String),
}

impl VertexKind {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_isolated(&self) -> bool {
        matches!(self, VertexKind::Isolated)
    }
}

/// A vertex: a type tag plus an unordered (here: `BTreeMap`, for a
/// deterministic iteration/equality order) set of string properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub kind: VertexKind,
    pub properties: BTreeMap<String, String>,
}

impl Vertex {
    pub fn new(kind: VertexKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn isolated() -> Self {
        Self::new(VertexKind::Isolated)
    }

    pub fn is_isolated(&self) -> bool {
        self.kind.is_isolated()
    }

    /// Whether `self` and `other` carry the same type tag and properties —
    /// the "no relabel needed" test used throughout the estimator and the
    /// editorial cost accounting.
    pub fn same_label(&self, other: &Vertex) -> bool {
        self.kind == other.kind && self.properties == other.properties
    }
}
