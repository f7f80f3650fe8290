//! The admissible lower-bound estimator for extending a partial mapping by
//! one vertex pair (component C3).

use crate::assignment::INFEASIBLE_COST;
use crate::external::PossibleMappings;
use crate::graph::{SchemaGraph, VertexId};
use crate::mapping::Mapping;
use ahash::RandomState;
use std::collections::HashMap;

/// Per-parent-expansion cache for the isolated-vertex shortcut (§4.3). Scoped
/// to one parent expansion because its result depends on the current
/// mapping `M`; callers create a fresh one per expansion and drop it once
/// that expansion's cost-matrix fill is done.
#[derive(Default)]
pub struct DeletionCostCache {
    cache: HashMap<VertexId, f64, RandomState>,
}

impl DeletionCostCache {
    pub fn new() -> Self {
        Self {
            cache: HashMap::with_hasher(RandomState::new()),
        }
    }
}

/// Returns an admissible lower bound on the additional cost of any
/// completion of `mapping ∪ {v → u}`.
pub fn lower_bound(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &dyn PossibleMappings,
    mapping: &Mapping,
    v: VertexId,
    u: VertexId,
    cache: &mut DeletionCostCache,
) -> f64 {
    if !possible.mapping_possible(v, u) {
        return INFEASIBLE_COST;
    }

    let v_isolated = source.vertex(v).is_isolated();
    let u_isolated = target.vertex(u).is_isolated();
    if v_isolated && u_isolated {
        return 0.0;
    }
    if v_isolated {
        return *cache
            .cache
            .entry(u)
            .or_insert_with(|| isolated_estimate(target, mapping, u, true));
    }
    if u_isolated {
        return *cache
            .cache
            .entry(v)
            .or_insert_with(|| isolated_estimate(source, mapping, v, false));
    }

    let eq_nodes = if source.vertex(v).same_label(target.vertex(u)) {
        0.0
    } else {
        1.0
    };

    let inner_v = inner_labels(source, mapping, v, true);
    let inner_u = inner_labels(target, mapping, u, false);
    let multiset_edit = multiset_edit_distance(&inner_v, &inner_u);

    let anchored = anchored_cost(source, target, mapping, v, u);

    eq_nodes + multiset_edit as f64 + anchored
}

/// Multiset of out-edge labels of `x` whose sink is not yet mapped (an
/// "inner" edge, per the glossary).
fn inner_labels(
    g: &SchemaGraph,
    mapping: &Mapping,
    x: VertexId,
    is_source_side: bool,
) -> Vec<Option<String>> {
    g.out_edges(x)
        .filter(|e| {
            if is_source_side {
                !mapping.contains_source(e.sink)
            } else {
                !mapping.contains_target(e.sink)
            }
        })
        .map(|e| e.label)
        .collect()
}

/// `max(|a|, |b|) - |a ∩ b|` as multisets.
fn multiset_edit_distance(a: &[Option<String>], b: &[Option<String>]) -> usize {
    let mut remaining: Vec<Option<String>> = b.to_vec();
    let mut intersection = 0;
    for label in a {
        if let Some(pos) = remaining.iter().position(|l| l == label) {
            remaining.remove(pos);
            intersection += 1;
        }
    }
    a.len().max(b.len()) - intersection
}

/// The forced edit cost contributed by edges touching vertices already
/// anchored in `mapping` (§4.3.1).
fn anchored_cost(
    source: &SchemaGraph,
    target: &SchemaGraph,
    mapping: &Mapping,
    v: VertexId,
    u: VertexId,
) -> f64 {
    let mut cost = 0.0;
    let mut u_out_matched: Vec<bool> = target.out_edges(u).map(|_| false).collect();
    let mut u_in_matched: Vec<bool> = target.in_edges(u).map(|_| false).collect();

    for e_v in source.out_edges(v) {
        if !mapping.contains_source(e_v.sink) {
            continue;
        }
        let w_prime = mapping.target_of(e_v.sink).unwrap();
        let found = target
            .out_edges(u)
            .enumerate()
            .find(|(_, e_u)| e_u.sink == w_prime);
        match found {
            Some((idx, e_u)) => {
                u_out_matched[idx] = true;
                if e_u.label != e_v.label {
                    cost += 1.0;
                }
            }
            None => cost += 1.0,
        }
    }
    for e_v in source.in_edges(v) {
        if !mapping.contains_source(e_v.source) {
            continue;
        }
        let w_prime = mapping.target_of(e_v.source).unwrap();
        let found = target
            .in_edges(u)
            .enumerate()
            .find(|(_, e_u)| e_u.source == w_prime);
        match found {
            Some((idx, e_u)) => {
                u_in_matched[idx] = true;
                if e_u.label != e_v.label {
                    cost += 1.0;
                }
            }
            None => cost += 1.0,
        }
    }

    for (idx, e_u) in target.out_edges(u).enumerate() {
        if u_out_matched[idx] {
            continue;
        }
        if mapping.contains_target(e_u.sink) {
            cost += 1.0;
        }
    }
    for (idx, e_u) in target.in_edges(u).enumerate() {
        if u_in_matched[idx] {
            continue;
        }
        if mapping.contains_target(e_u.source) {
            cost += 1.0;
        }
    }

    cost
}

/// The estimate used when one side of the candidate pair is `ISOLATED`:
/// counts the vertex insertion/deletion itself plus the edges it forces
/// (§4.3.2).
fn isolated_estimate(g: &SchemaGraph, mapping: &Mapping, x: VertexId, x_is_target_side: bool) -> f64 {
    let mut inner_edges_count = 0usize;
    let mut labeled_edges_from_anchored = 0usize;

    for e in g.out_edges(x) {
        let other_mapped = if x_is_target_side {
            mapping.contains_target(e.sink)
        } else {
            mapping.contains_source(e.sink)
        };
        if !other_mapped {
            inner_edges_count += 1;
        } else if e.label.is_some() {
            labeled_edges_from_anchored += 1;
        }
    }
    for e in g.in_edges(x) {
        let other_mapped = if x_is_target_side {
            mapping.contains_target(e.source)
        } else {
            mapping.contains_source(e.source)
        };
        if other_mapped && e.label.is_some() {
            labeled_edges_from_anchored += 1;
        }
    }

    1.0 + inner_edges_count as f64 + labeled_edges_from_anchored as f64
}
