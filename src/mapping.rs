//! A growing partial bijection between source and target vertices
//! (component C2).

use crate::graph::VertexId;
use ahash::RandomState;
use bimap::BiHashMap;

/// A partial mapping of prefix shape: `level()` pairs have been committed so
/// far, in commit order. The search imposes a fixed source-vertex order —
/// level `k` always decides the image of `all_sources[k]` — so `Mapping`
/// itself does not need to know that order; it just records what has been
/// committed.
///
/// Backed by a `BiHashMap` so `contains_source`/`contains_target`/
/// `target_of`/`source_of` are O(1). `extend`/`remove_last` clone the map,
/// which is copy-on-extend over a small `level` — acceptable since a
/// `Mapping` is cloned at most once per expanded search node.
#[derive(Clone)]
pub struct Mapping {
    pairs: BiHashMap<VertexId, VertexId, RandomState, RandomState>,
    order: Vec<(VertexId, VertexId)>,
    /// Number of leading entries in `order` contributed by the caller's
    /// `start_mapping` rather than chosen during search. Their targets are
    /// permanently excluded from the available pool and never surface from
    /// `for_each_non_fixed_target`.
    fixed_level: usize,
}

impl Mapping {
    pub fn empty() -> Self {
        Self {
            pairs: BiHashMap::with_hashers(RandomState::new(), RandomState::new()),
            order: Vec::new(),
            fixed_level: 0,
        }
    }

    /// Builds a mapping from a fixed prefix of `(source, target)` pairs that
    /// the caller supplies up front (`start_mapping` in the search engine).
    /// All of `pairs` become the fixed prefix.
    pub fn from_fixed_prefix(pairs: impl IntoIterator<Item = (VertexId, VertexId)>) -> Self {
        let mut m = Self::empty();
        for (v, u) in pairs {
            m.pairs.insert(v, u);
            m.order.push((v, u));
        }
        m.fixed_level = m.order.len();
        m
    }

    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn contains_source(&self, v: VertexId) -> bool {
        self.pairs.contains_left(&v)
    }

    pub fn contains_target(&self, u: VertexId) -> bool {
        self.pairs.contains_right(&u)
    }

    pub fn target_of(&self, v: VertexId) -> Option<VertexId> {
        self.pairs.get_by_left(&v).copied()
    }

    pub fn source_of(&self, u: VertexId) -> Option<VertexId> {
        self.pairs.get_by_right(&u).copied()
    }

    pub fn for_each_target(&self, mut f: impl FnMut(VertexId)) {
        for (_, u) in &self.order {
            f(*u);
        }
    }

    /// Visits every committed `(source, target)` pair, in commit order.
    pub fn for_each_pair(&self, mut f: impl FnMut(VertexId, VertexId)) {
        for &(v, u) in &self.order {
            f(v, u);
        }
    }

    /// Targets committed *after* the fixed prefix — the ones the search
    /// itself chose and that must be subtracted from the available pool
    /// when building the next level's cost matrix.
    pub fn for_each_non_fixed_target(&self, mut f: impl FnMut(VertexId)) {
        for (_, u) in &self.order[self.fixed_level..] {
            f(*u);
        }
    }

    /// Returns a new mapping with `(v, u)` committed as the next pair.
    /// `v` and `u` must not already be present; violating that is an
    /// internal invariant error, not a recoverable condition (the caller —
    /// the search engine — never passes a vertex already in the mapping).
    pub fn extend(&self, v: VertexId, u: VertexId) -> Mapping {
        debug_assert!(!self.contains_source(v), "source already mapped");
        debug_assert!(!self.contains_target(u), "target already mapped");
        let mut next = self.clone();
        next.pairs.insert(v, u);
        next.order.push((v, u));
        next
    }

    /// Returns the parent-prefix mapping (this mapping minus its last
    /// committed pair). Panics if this mapping has no committed pairs
    /// beyond the fixed prefix — callers only ever call this on a mapping
    /// they themselves extended.
    pub fn remove_last(&self) -> Mapping {
        assert!(
            self.order.len() > self.fixed_level,
            "cannot remove_last below the fixed prefix"
        );
        let mut prev = self.clone();
        let (v, u) = prev.order.pop().unwrap();
        prev.pairs.remove_by_left(&v);
        debug_assert!(prev.target_of(v).is_none());
        let _ = u;
        prev
    }
}
