//! The public entry points wiring the graph model, the search engine, and
//! their collaborators together (component C9).

use crate::external::{PossibleMappings, RunningCheck};
use crate::graph::{SchemaGraph, SchemaGraphBuilder};
use crate::mapping::Mapping;
use crate::search::{self, OptimalEdit};

use crate::error::GedError;

/// Computes the graph edit distance from `source` to `target`.
///
/// Pads both graphs to equal size with `ISOLATED` vertices so the search can
/// treat the problem as a total bijection, then delegates to the search
/// engine with an empty starting mapping.
pub fn diff(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &dyn PossibleMappings,
    running_check: &dyn RunningCheck,
) -> Result<OptimalEdit, GedError> {
    diff_with_start(source, target, possible, Mapping::empty(), running_check)
}

/// As [`diff`], but for callers that already know part of the mapping (for
/// instance, vertices carrying stable caller-assigned identity). `
/// start_mapping`'s pairs are fixed: the search never reconsiders them.
pub fn diff_with_start(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &dyn PossibleMappings,
    start_mapping: Mapping,
    running_check: &dyn RunningCheck,
) -> Result<OptimalEdit, GedError> {
    let n = source.size().max(target.size());
    let (padded_source, padded_target) = pad_to_equal_size(source, target, n);

    let all_sources: Vec<_> = padded_source.vertices().collect();
    let all_targets: Vec<_> = padded_target.vertices().collect();

    search::run(
        &padded_source,
        &padded_target,
        possible,
        &all_sources,
        &all_targets,
        start_mapping,
        running_check,
    )
}

fn pad_to_equal_size(source: &SchemaGraph, target: &SchemaGraph, n: usize) -> (SchemaGraph, SchemaGraph) {
    if source.size() == n && target.size() == n {
        return (source.clone(), target.clone());
    }
    let padded_source = rebuild_padded(source, n);
    let padded_target = rebuild_padded(target, n);
    (padded_source, padded_target)
}

fn rebuild_padded(g: &SchemaGraph, n: usize) -> SchemaGraph {
    if g.size() == n {
        return g.clone();
    }
    let mut builder = SchemaGraphBuilder::new();
    for v in g.vertices() {
        builder.add_vertex(g.vertex(v).clone());
    }
    for v in g.vertices() {
        for e in g.out_edges(v) {
            builder.add_edge(e.source, e.sink, e.label);
        }
    }
    builder.pad_to(n);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editorial::cost_of_mapping;
    use crate::external::{AllowAll, NeverCancel};
    use crate::graph::{SchemaGraphBuilder, Vertex, VertexKind};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn typed(name: &str) -> Vertex {
        Vertex::new(VertexKind::named(name))
    }

    const TYPE_ALPHABET: [&str; 2] = ["T0", "T1"];
    const LABEL_ALPHABET: [Option<&str>; 2] = [None, Some("e")];

    /// A small random directed, vertex- and edge-labeled graph (`|V| <= 5`):
    /// a handful of bounded random choices consumed directly from the
    /// `quickcheck::Gen`.
    #[derive(Clone, Debug)]
    struct SmallGraph {
        vertex_types: Vec<usize>,
        edges: Vec<(usize, usize, usize)>,
    }

    impl Arbitrary for SmallGraph {
        fn arbitrary(g: &mut Gen) -> Self {
            let vertex_count = 1 + (usize::arbitrary(g) % 5);
            let vertex_types: Vec<usize> = (0..vertex_count)
                .map(|_| usize::arbitrary(g) % TYPE_ALPHABET.len())
                .collect();
            let edge_count = usize::arbitrary(g) % (vertex_count + 2);
            let edges = (0..edge_count)
                .map(|_| {
                    let from = usize::arbitrary(g) % vertex_count;
                    let to = usize::arbitrary(g) % vertex_count;
                    let label = usize::arbitrary(g) % LABEL_ALPHABET.len();
                    (from, to, label)
                })
                .collect();
            SmallGraph { vertex_types, edges }
        }
    }

    impl SmallGraph {
        fn build(&self) -> SchemaGraph {
            let mut builder = SchemaGraphBuilder::new();
            let vertices: Vec<_> = self
                .vertex_types
                .iter()
                .map(|&t| builder.add_vertex(Vertex::new(VertexKind::named(TYPE_ALPHABET[t]))))
                .collect();
            for &(from, to, label) in &self.edges {
                builder.add_edge(vertices[from], vertices[to], LABEL_ALPHABET[label].map(String::from));
            }
            builder.build()
        }
    }

    fn permutations(n: usize) -> Vec<Vec<usize>> {
        if n == 0 {
            return vec![vec![]];
        }
        let mut result = Vec::new();
        let mut items: Vec<usize> = (0..n).collect();
        permute(&mut items, 0, &mut result);
        result
    }

    fn permute(items: &mut Vec<usize>, k: usize, out: &mut Vec<Vec<usize>>) {
        if k == items.len() {
            out.push(items.clone());
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permute(items, k + 1, out);
            items.swap(k, i);
        }
    }

    fn brute_force_ged(source: &SchemaGraph, target: &SchemaGraph) -> i64 {
        let n = source.size().max(target.size());
        let padded_source = rebuild_padded(source, n);
        let padded_target = rebuild_padded(target, n);
        let all_sources: Vec<_> = padded_source.vertices().collect();
        let all_targets: Vec<_> = padded_target.vertices().collect();

        permutations(n)
            .into_iter()
            .map(|perm| {
                let mut mapping = Mapping::empty();
                for (i, &p) in perm.iter().enumerate() {
                    mapping = mapping.extend(all_sources[i], all_targets[p]);
                }
                cost_of_mapping(&padded_source, &padded_target, &mapping, None)
            })
            .min()
            .unwrap_or(0)
    }

    #[quickcheck]
    fn ged_matches_brute_force_minimum(source: SmallGraph, target: SmallGraph) -> bool {
        let g1 = source.build();
        let g2 = target.build();
        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        let expected = brute_force_ged(&g1, &g2);
        result.ged == expected
    }

    #[quickcheck]
    fn identical_graphs_have_zero_distance(source: SmallGraph) -> bool {
        let g1 = source.build();
        let g2 = source.build();
        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        result.ged == 0
    }

    #[quickcheck]
    fn returned_mapping_is_total_and_bijective(source: SmallGraph, target: SmallGraph) -> bool {
        let g1 = source.build();
        let g2 = target.build();
        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        let n = g1.size().max(g2.size());

        let mut sources_seen = std::collections::HashSet::new();
        let mut targets_seen = std::collections::HashSet::new();
        let mut count = 0;
        result.mapping.for_each_pair(|v, u| {
            count += 1;
            sources_seen.insert(v.to_raw());
            targets_seen.insert(u.to_raw());
        });
        count == n && sources_seen.len() == n && targets_seen.len() == n
    }

    #[quickcheck]
    fn edit_list_length_matches_ged(source: SmallGraph, target: SmallGraph) -> bool {
        let g1 = source.build();
        let g2 = target.build();
        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        result.edits.len() as i64 == result.ged
    }

    #[test]
    fn two_identical_two_vertex_graphs() {
        let mut b1 = SchemaGraphBuilder::new();
        let a = b1.add_vertex(typed("TypeA").with_property("p", "1"));
        let b = b1.add_vertex(typed("TypeB"));
        b1.add_edge(a, b, Some("e".to_string()));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        let a2 = b2.add_vertex(typed("TypeA").with_property("p", "1"));
        let b2v = b2.add_vertex(typed("TypeB"));
        b2.add_edge(a2, b2v, Some("e".to_string()));
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        assert_eq!(result.ged, 0);
        assert!(result.edits.is_empty());
        assert_eq!(result.mapping.target_of(a), Some(a2));
        assert_eq!(result.mapping.target_of(b), Some(b2v));
    }

    #[test]
    fn single_property_change() {
        let mut b1 = SchemaGraphBuilder::new();
        let a = b1.add_vertex(typed("T").with_property("p", "1"));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        let a2 = b2.add_vertex(typed("T").with_property("p", "2"));
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        assert_eq!(result.ged, 1);
        assert_eq!(result.mapping.target_of(a), Some(a2));
        assert_eq!(result.edits.len(), 1);
    }

    #[test]
    fn edge_label_change() {
        let mut b1 = SchemaGraphBuilder::new();
        let a = b1.add_vertex(typed("T"));
        let b = b1.add_vertex(typed("T"));
        b1.add_edge(a, b, Some("x".to_string()));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        let a2 = b2.add_vertex(typed("T"));
        let b2v = b2.add_vertex(typed("T"));
        b2.add_edge(a2, b2v, Some("y".to_string()));
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        assert_eq!(result.ged, 1);
    }

    #[test]
    fn pure_insertion() {
        let mut b1 = SchemaGraphBuilder::new();
        b1.add_vertex(typed("T"));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        b2.add_vertex(typed("T"));
        b2.add_vertex(typed("T"));
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        assert_eq!(result.ged, 1);
    }

    #[test]
    fn edge_direction_matters() {
        let mut b1 = SchemaGraphBuilder::new();
        let a = b1.add_vertex(typed("T"));
        let b = b1.add_vertex(typed("T"));
        b1.add_edge(a, b, None);
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        let a2 = b2.add_vertex(typed("T"));
        let b2v = b2.add_vertex(typed("T"));
        b2.add_edge(b2v, a2, None);
        let g2 = b2.build();

        // Force identity on vertex labels so the only choice is which edge to
        // keep: deleting a->b and inserting b->a costs 2.
        let start = Mapping::from_fixed_prefix([(a, a2), (b, b2v)]);
        let result = diff_with_start(&g1, &g2, &AllowAll, start, &NeverCancel).unwrap();
        assert_eq!(result.ged, 2);
    }

    #[test]
    fn pruning_stress_small_random_edits() {
        let mut b1 = SchemaGraphBuilder::new();
        let mut vertices = vec![];
        for i in 0..8 {
            vertices.push(b1.add_vertex(typed(&format!("T{}", i % 2))));
        }
        for i in 0..8 {
            b1.add_edge(vertices[i], vertices[(i + 1) % 8], Some("e".to_string()));
        }
        let g1 = b1.build();

        // apply exactly 3 edits: relabel one vertex, drop one edge, change one
        // edge's label.
        let mut b2 = SchemaGraphBuilder::new();
        let mut v2 = vec![];
        for i in 0..8 {
            let name = if i == 0 { "T9" } else if i % 2 == 0 { "T0" } else { "T1" };
            v2.push(b2.add_vertex(typed(name)));
        }
        for i in 0..8 {
            if i == 3 {
                continue;
            }
            let label = if i == 5 { "f" } else { "e" };
            b2.add_edge(v2[i], v2[(i + 1) % 8], Some(label.to_string()));
        }
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        assert!(result.ged <= 3);
    }

    #[test]
    fn diff_pads_unequal_graphs_before_searching() {
        let mut b1 = SchemaGraphBuilder::new();
        b1.add_vertex(Vertex::new(VertexKind::named("A")));
        b1.add_vertex(Vertex::new(VertexKind::named("B")));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        b2.add_vertex(Vertex::new(VertexKind::named("A")));
        let g2 = b2.build();

        let result = diff(&g1, &g2, &AllowAll, &NeverCancel).unwrap();
        // One vertex must be deleted to go from 2 source vertices to 1 target.
        assert_eq!(result.ged, 1);
    }

    #[test]
    fn diff_with_start_respects_fixed_prefix() {
        let mut b1 = SchemaGraphBuilder::new();
        let a = b1.add_vertex(Vertex::new(VertexKind::named("A")));
        let b = b1.add_vertex(Vertex::new(VertexKind::named("B")));
        let g1 = b1.build();

        let mut b2 = SchemaGraphBuilder::new();
        let a2 = b2.add_vertex(Vertex::new(VertexKind::named("B")));
        let b2v = b2.add_vertex(Vertex::new(VertexKind::named("A")));
        let g2 = b2.build();

        // Force a -> a2 even though a's label doesn't match a2's; the search
        // must accept the forced relabel instead of finding the zero-cost
        // swap it would otherwise prefer.
        let start = Mapping::from_fixed_prefix([(a, a2)]);
        let result = diff_with_start(&g1, &g2, &AllowAll, start, &NeverCancel).unwrap();
        assert!(result.mapping.contains_source(a));
        assert_eq!(result.mapping.target_of(a), Some(a2));
        assert_eq!(result.mapping.target_of(b), Some(b2v));
        assert_eq!(result.ged, 2);
    }
}
