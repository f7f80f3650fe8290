//! Deterministic true-cost accounting over a (partial or complete) mapping,
//! producing the concrete list of edit operations that realize it
//! (component C6).

use crate::graph::{EdgeId, SchemaGraph, VertexId};
use crate::mapping::Mapping;

/// One edit, carrying enough identifying data to be replayed against the
/// source graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    InsertVertex { target: VertexId },
    DeleteVertex { source: VertexId },
    RelabelVertex { source: VertexId, target: VertexId },
    InsertEdge { target: EdgeId },
    DeleteEdge { source: EdgeId },
    RelabelEdge { source: EdgeId, target: EdgeId },
}

/// Scores `mapping` against `src`/`tgt`, optionally emitting the edit
/// operations that realize it into `out_edits`. `mapping` need not be total —
/// only pairs actually committed are scored, which is what makes this
/// function double as both a true-cost scorer for a complete mapping and a
/// running cost for the committed prefix during search.
pub fn cost_of_mapping(
    src: &SchemaGraph,
    tgt: &SchemaGraph,
    mapping: &Mapping,
    mut out_edits: Option<&mut Vec<EditOperation>>,
) -> i64 {
    let mut cost: i64 = 0;

    mapping.for_each_pair(|v, u| {
        let sv = src.vertex(v);
        let su = tgt.vertex(u);
        if sv.is_isolated() && su.is_isolated() {
            return;
        }
        if sv.is_isolated() {
            cost += 1;
            if let Some(edits) = out_edits.as_deref_mut() {
                edits.push(EditOperation::InsertVertex { target: u });
            }
        } else if su.is_isolated() {
            cost += 1;
            if let Some(edits) = out_edits.as_deref_mut() {
                edits.push(EditOperation::DeleteVertex { source: v });
            }
        } else if !sv.same_label(su) {
            cost += 1;
            if let Some(edits) = out_edits.as_deref_mut() {
                edits.push(EditOperation::RelabelVertex {
                    source: v,
                    target: u,
                });
            }
        }
    });

    let mut matched_target_edges: Vec<EdgeId> = Vec::new();

    for v1 in src.vertices() {
        let Some(u1) = mapping.target_of(v1) else {
            continue;
        };
        for e in src.out_edges(v1) {
            let Some(u2) = mapping.target_of(e.sink) else {
                continue;
            };
            match tgt.edge_between(u1, u2) {
                Some(target_edge) => {
                    matched_target_edges.push(target_edge.id);
                    if target_edge.label != e.label {
                        cost += 1;
                        if let Some(edits) = out_edits.as_deref_mut() {
                            edits.push(EditOperation::RelabelEdge {
                                source: e.id,
                                target: target_edge.id,
                            });
                        }
                    }
                }
                None => {
                    cost += 1;
                    if let Some(edits) = out_edits.as_deref_mut() {
                        edits.push(EditOperation::DeleteEdge { source: e.id });
                    }
                }
            }
        }
    }

    for u1 in tgt.vertices() {
        let Some(_v1) = mapping.source_of(u1) else {
            continue;
        };
        for e in tgt.out_edges(u1) {
            if mapping.source_of(e.sink).is_none() {
                continue;
            }
            if matched_target_edges.contains(&e.id) {
                continue;
            }
            cost += 1;
            if let Some(edits) = out_edits.as_deref_mut() {
                edits.push(EditOperation::InsertEdge { target: e.id });
            }
        }
    }

    cost
}
