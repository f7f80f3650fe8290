//! The A* best-first branch-and-bound search with sibling-lazy child
//! expansion (component C5).

use crate::assignment::{Assignment, CostMatrix, HungarianSolver, MurtyEnumerator, INFEASIBLE_COST};
use crate::editorial::{cost_of_mapping, EditOperation};
use crate::estimate::{lower_bound, DeletionCostCache};
use crate::external::{PossibleMappings, RunningCheck};
use crate::graph::{SchemaGraph, VertexId};
use crate::mapping::Mapping;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// The search's output: the best total mapping found, its edit list, and the
/// integer edit distance. `ged` starts at `i64::MAX` and only ever decreases.
#[derive(Debug, Clone)]
pub struct OptimalEdit {
    pub mapping: Mapping,
    pub edits: Vec<EditOperation>,
    pub ged: i64,
}

impl OptimalEdit {
    fn unbounded() -> Self {
        Self {
            mapping: Mapping::empty(),
            edits: Vec::new(),
            ged: i64::MAX,
        }
    }
}

/// One slot in a `MappingEntry`'s sibling stream. `Dummy` marks the end of
/// the stream; once popped, the owning entry's `siblings_finished` flips to
/// `true` and the entry is not re-pushed for that reason alone.
enum SiblingSlot {
    Entry(MappingEntry),
    Dummy,
}

/// A node in the search tree: a partial mapping, its level, its admissible
/// lower-bound cost, and the bookkeeping needed to lazily produce its
/// siblings (the other assignments Murty enumeration would have chosen at
/// this node's parent) one at a time.
struct MappingEntry {
    mapping: Mapping,
    level: usize,
    lower_bound_cost: f64,
    siblings: VecDeque<SiblingSlot>,
    siblings_finished: bool,
    /// Set once `expand_children` has run for this logical node. A node is
    /// popped repeatedly to drain its sibling stream one pull at a time;
    /// without this flag each of those re-pops would rebuild and re-push the
    /// same child subtree again.
    children_expanded: bool,
    /// The Hungarian assignment that produced this entry's mapping, and the
    /// `available_targets` snapshot it was computed against — together
    /// enough to reconstruct this entry's full completion on demand. Empty
    /// for the root.
    assignment_columns: Vec<usize>,
    available_targets: Vec<VertexId>,
}

/// Ordered by `lower_bound_cost` ascending, ties broken by `level`
/// descending (deeper nodes first) — a `BinaryHeap` is a max-heap, so the
/// `Ord` impl below inverts both comparisons to make the heap behave as a
/// min-heap over cost.
struct ScoredEntry(MappingEntry);

impl PartialEq for ScoredEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.lower_bound_cost == other.0.lower_bound_cost && self.0.level == other.0.level
    }
}
impl Eq for ScoredEntry {}
impl PartialOrd for ScoredEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ScoredEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other
            .0
            .lower_bound_cost
            .partial_cmp(&self.0.lower_bound_cost)
        {
            Some(Ordering::Equal) | None => self.0.level.cmp(&other.0.level),
            Some(ord) => ord,
        }
    }
}

/// Drives the search to completion. `all_sources`/`all_targets` fix the
/// vertex order the search commits in; level `k` always decides the image of
/// `all_sources[k]`.
pub fn run(
    src: &SchemaGraph,
    tgt: &SchemaGraph,
    possible: &dyn PossibleMappings,
    all_sources: &[VertexId],
    all_targets: &[VertexId],
    start_mapping: Mapping,
    running_check: &dyn RunningCheck,
) -> Result<OptimalEdit, crate::error::GedError> {
    let n = all_sources.len();
    debug_assert_eq!(n, all_targets.len());

    log::debug!(
        "graph edit distance search starting: n={}, start_mapping_size={}",
        n,
        start_mapping.size()
    );

    let mut optimal = OptimalEdit::unbounded();

    let start_level = start_mapping.size();
    let start_cost = cost_of_mapping(src, tgt, &start_mapping, None) as f64;

    let mut all_non_fixed_targets: Vec<VertexId> = Vec::with_capacity(n - start_level);
    for &u in all_targets {
        if !start_mapping.contains_target(u) {
            all_non_fixed_targets.push(u);
        }
    }

    let mut heap = BinaryHeap::new();
    heap.push(ScoredEntry(MappingEntry {
        mapping: start_mapping,
        level: start_level,
        lower_bound_cost: start_cost,
        siblings: VecDeque::new(),
        siblings_finished: true,
        children_expanded: false,
        assignment_columns: Vec::new(),
        available_targets: Vec::new(),
    }));

    let mut nodes_popped: u64 = 0;

    while let Some(ScoredEntry(mut entry)) = heap.pop() {
        nodes_popped += 1;
        log::trace!(
            "pop: level={}, lower_bound_cost={}",
            entry.level,
            entry.lower_bound_cost
        );

        if entry.lower_bound_cost >= optimal.ged as f64 {
            running_check.check()?;
            continue;
        }

        let mut requeue_self = false;
        if entry.level > 0 && !entry.siblings_finished {
            requeue_self = pull_sibling(
                &mut entry,
                &mut heap,
                &mut optimal,
                src,
                tgt,
                all_sources,
            )?;
        }

        if entry.level < n && !entry.children_expanded {
            expand_children(
                &entry,
                &mut heap,
                &mut optimal,
                src,
                tgt,
                possible,
                all_sources,
                &all_non_fixed_targets,
            )?;
            entry.children_expanded = true;
        }

        if requeue_self {
            heap.push(ScoredEntry(entry));
        }

        running_check.check()?;
    }

    log::debug!(
        "graph edit distance search finished: ged={}, nodes_popped={}",
        optimal.ged,
        nodes_popped
    );

    Ok(optimal)
}

fn available_targets_for(entry_mapping: &Mapping, all_non_fixed_targets: &[VertexId]) -> Vec<VertexId> {
    let mut taken: Vec<VertexId> = Vec::new();
    entry_mapping.for_each_non_fixed_target(|u| taken.push(u));
    all_non_fixed_targets
        .iter()
        .copied()
        .filter(|u| !taken.contains(u))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn expand_children(
    entry: &MappingEntry,
    heap: &mut BinaryHeap<ScoredEntry>,
    optimal: &mut OptimalEdit,
    src: &SchemaGraph,
    tgt: &SchemaGraph,
    possible: &dyn PossibleMappings,
    all_sources: &[VertexId],
    all_non_fixed_targets: &[VertexId],
) -> Result<(), crate::error::GedError> {
    let k = entry.level;
    let n = all_sources.len();
    let m_map = &entry.mapping;

    let available_targets = available_targets_for(m_map, all_non_fixed_targets);
    let m = n - k;
    if available_targets.len() != m {
        return Err(crate::error::GedError::InvariantViolation(format!(
            "available target count {} does not match remaining row count {}",
            available_targets.len(),
            m
        )));
    }

    let mut pristine = CostMatrix::new(m);
    let mut cache = DeletionCostCache::new();
    for (row, &v_row) in all_sources[k..n].iter().enumerate() {
        for (col, &u_col) in available_targets.iter().enumerate() {
            let cost = lower_bound(src, tgt, possible, m_map, v_row, u_col, &mut cache);
            pristine.set(row, col, cost);
        }
    }
    let working = pristine.clone();

    let assignment = HungarianSolver::solve(&working);
    let s = true_cost(&pristine, &assignment);
    let base = cost_of_mapping(src, tgt, m_map, None) as f64;
    let f = base + s;

    if f >= optimal.ged as f64 {
        return Ok(());
    }

    let v_i = all_sources[k];
    let child_target = available_targets[assignment.columns[0]];
    let child_mapping = m_map.extend(v_i, child_target);

    // Full completion for this child: extend with every pair the assignment
    // chose, score it, and adopt it as the new optimum if strictly better.
    let mut completion = m_map.clone();
    for i in 0..m {
        completion = completion.extend(all_sources[k + i], available_targets[assignment.columns[i]]);
    }
    let mut edits = Vec::new();
    let completion_cost = cost_of_mapping(src, tgt, &completion, Some(&mut edits));
    if completion_cost < optimal.ged {
        optimal.ged = completion_cost;
        optimal.mapping = completion;
        optimal.edits = edits;
        log::debug!("improved optimum: ged={}", optimal.ged);
    }

    let mut siblings = VecDeque::new();
    let mut enumerator = MurtyEnumerator::new(&pristine, &assignment);
    for _ in 0..(m.saturating_sub(1)) {
        let Some(next) = enumerator.next_child() else {
            break;
        };
        if pristine.at(0, next.columns[0]) >= INFEASIBLE_COST {
            break;
        }
        let sibling_s = true_cost(&pristine, &next);
        let sibling_f = base + sibling_s;
        if sibling_f >= optimal.ged as f64 {
            break;
        }
        let sibling_target = available_targets[next.columns[0]];
        let sibling_mapping = m_map.extend(v_i, sibling_target);
        siblings.push_back(SiblingSlot::Entry(MappingEntry {
            mapping: sibling_mapping,
            level: k + 1,
            lower_bound_cost: sibling_f,
            siblings: VecDeque::new(),
            siblings_finished: true,
            children_expanded: false,
            assignment_columns: next.columns,
            available_targets: available_targets.clone(),
        }));
    }
    siblings.push_back(SiblingSlot::Dummy);

    heap.push(ScoredEntry(MappingEntry {
        mapping: child_mapping,
        level: k + 1,
        lower_bound_cost: f,
        siblings,
        siblings_finished: false,
        children_expanded: false,
        assignment_columns: assignment.columns,
        available_targets,
    }));

    Ok(())
}

/// Drains one slot from `entry`'s sibling stream. Returns whether `entry`
/// itself should be re-pushed onto the main heap afterward: `true` unless
/// the popped slot was `Dummy` (in which case `entry.siblings_finished` is
/// set and there is nothing left to drain). `entry` itself is mutated
/// in-place and otherwise unchanged — callers re-push the very same entry,
/// not a copy, so a node's `children_expanded` flag survives every re-pop
/// that exists solely to drain another sibling.
fn pull_sibling(
    entry: &mut MappingEntry,
    heap: &mut BinaryHeap<ScoredEntry>,
    optimal: &mut OptimalEdit,
    src: &SchemaGraph,
    tgt: &SchemaGraph,
    all_sources: &[VertexId],
) -> Result<bool, crate::error::GedError> {
    let Some(slot) = entry.siblings.pop_front() else {
        entry.siblings_finished = true;
        return Ok(false);
    };
    match slot {
        SiblingSlot::Dummy => {
            entry.siblings_finished = true;
            Ok(false)
        }
        SiblingSlot::Entry(sibling) => {
            if sibling.lower_bound_cost < optimal.ged as f64 {
                // Reconstruct the sibling's full completion: its
                // parent-prefix (== this entry's parent mapping) plus every
                // pair its own assignment chose.
                let parent_prefix = sibling.mapping.remove_last();
                let k = sibling.level - 1;
                let mut completion = parent_prefix;
                for (i, &col) in sibling.assignment_columns.iter().enumerate() {
                    completion =
                        completion.extend(all_sources[k + i], sibling.available_targets[col]);
                }
                if completion.size() != all_sources.len() {
                    return Err(crate::error::GedError::InvariantViolation(format!(
                        "sibling reconstruction produced a mapping of size {} (expected {})",
                        completion.size(),
                        all_sources.len()
                    )));
                }
                let mut edits = Vec::new();
                let completion_cost = cost_of_mapping(src, tgt, &completion, Some(&mut edits));
                if completion_cost < optimal.ged {
                    optimal.ged = completion_cost;
                    optimal.mapping = completion;
                    optimal.edits = edits;
                    log::debug!("improved optimum: ged={}", optimal.ged);
                }

                heap.push(ScoredEntry(sibling));
            }
            Ok(true)
        }
    }
}

fn true_cost(pristine: &CostMatrix, assignment: &Assignment) -> f64 {
    assignment
        .columns
        .iter()
        .enumerate()
        .map(|(row, &col)| pristine.at(row, col))
        .sum()
}
