//! The Hungarian algorithm plus Murty-style k-best enumeration over a
//! square cost matrix (component C4).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sentinel cost standing in for a forbidden (infeasible) pairing. Large but
/// finite, so the Hungarian algorithm's potential bookkeeping stays in
/// ordinary floating-point arithmetic rather than needing to special-case
/// actual infinities.
pub const INFEASIBLE_COST: f64 = 1e18;

/// A square matrix of nonnegative reals (or [`INFEASIBLE_COST`] for
/// forbidden pairs). Two copies of the same logical matrix are typically
/// held at once: one pristine, used to compute true sums; one mutable
/// working copy, handed to [`HungarianSolver::solve`].
#[derive(Clone, Debug)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cost: f64) {
        self.cells[row * self.size + col] = cost;
    }
}

/// The result of solving an assignment problem: `columns[i]` is the column
/// assigned to row `i`, and `cost` is the matrix's notion of the total
/// (which may be computed over a restricted/forbidden-masked variant of the
/// matrix rather than the pristine one — callers recompute the true sum
/// against their own pristine copy, per §4.4).
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub columns: Vec<usize>,
    pub cost: f64,
}

/// Solves square assignment problems via the classic O(m³)
/// shortest-augmenting-path Hungarian algorithm with row/column potentials,
/// introducing one row at a time — the same family of algorithm the
/// sparse-edge-list `min_cost_weighted_matching` uses, generalized here to a
/// dense square matrix since every unmapped source vertex is a candidate for
/// every unmapped target vertex (subject to `INFEASIBLE_COST`).
pub struct HungarianSolver;

impl HungarianSolver {
    pub fn solve(matrix: &CostMatrix) -> Assignment {
        let n = matrix.size();
        if n == 0 {
            return Assignment {
                columns: Vec::new(),
                cost: 0.0,
            };
        }

        // u/v: potentials on rows/columns, 1-indexed internally (row 0 and
        // column 0 are sentinels) to keep the classic augmenting-path
        // bookkeeping free of special-casing "no row yet assigned".
        let mut u = vec![0.0f64; n + 1];
        let mut v = vec![0.0f64; n + 1];
        // p[j] = row currently matched to column j (1-indexed, 0 = none).
        let mut p = vec![0usize; n + 1];
        // way[j] = previous column in the augmenting path ending at j.
        let mut way = vec![0usize; n + 1];

        for i in 1..=n {
            p[0] = i;
            let mut j0 = 0usize;
            let mut minv = vec![f64::INFINITY; n + 1];
            let mut used = vec![false; n + 1];
            loop {
                used[j0] = true;
                let i0 = p[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0usize;
                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let cur = matrix.at(i0 - 1, j - 1) - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
                for j in 0..=n {
                    if used[j] {
                        u[p[j]] += delta;
                        v[j] -= delta;
                    } else {
                        minv[j] -= delta;
                    }
                }
                j0 = j1;
                if p[j0] == 0 {
                    break;
                }
            }
            loop {
                let j1 = way[j0];
                p[j0] = p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut columns = vec![0usize; n];
        let mut cost = 0.0;
        for j in 1..=n {
            if p[j] != 0 {
                columns[p[j] - 1] = j - 1;
                cost += matrix.at(p[j] - 1, j - 1);
            }
        }
        Assignment { columns, cost }
    }
}

/// One node in Murty's partition frontier: a forced prefix of row→column
/// pairs for rows `0..prefix.len()`, plus one column forbidden for row
/// `prefix.len()` (the first row not yet forced).
#[derive(Clone)]
struct PartitionNode {
    prefix: Vec<(usize, usize)>,
    forbidden_col: usize,
}

struct FrontierEntry {
    cost: f64,
    node: PartitionNode,
    solution: Vec<usize>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for FrontierEntry {}
impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the cheapest entry pops first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Enumerates assignments of a square cost matrix in nondecreasing total
/// cost, starting after the matrix's optimum (`first`, from
/// [`HungarianSolver::solve`]). Each call to [`MurtyEnumerator::next_child`]
/// returns the next-best assignment, or `None` once the partition frontier
/// is exhausted (at most `m - 1` calls succeed after the first assignment).
pub struct MurtyEnumerator<'a> {
    matrix: &'a CostMatrix,
    frontier: BinaryHeap<FrontierEntry>,
}

impl<'a> MurtyEnumerator<'a> {
    pub fn new(matrix: &'a CostMatrix, first: &Assignment) -> Self {
        let mut frontier = BinaryHeap::new();
        Self::partition(matrix, &[], &first.columns, &mut frontier);
        Self { matrix, frontier }
    }

    /// Partitions solution `solution` (forced prefix `base_prefix` plus the
    /// rows `base_prefix.len()..n` chosen by `solution`) into one child node
    /// per row from `base_prefix.len()` to `n - 1`, each forbidding that
    /// row's choice while forcing everything before it.
    fn partition(
        matrix: &CostMatrix,
        base_prefix: &[(usize, usize)],
        solution: &[usize],
        frontier: &mut BinaryHeap<FrontierEntry>,
    ) {
        let n = matrix.size();
        let base = base_prefix.len();
        for k in base..n {
            let mut prefix: Vec<(usize, usize)> = base_prefix.to_vec();
            for row in base..k {
                prefix.push((row, solution[row]));
            }
            let node = PartitionNode {
                prefix,
                forbidden_col: solution[k],
            };
            if let Some((assignment, cost)) = Self::solve_node(matrix, &node) {
                frontier.push(FrontierEntry {
                    cost,
                    node,
                    solution: assignment,
                });
            }
        }
    }

    /// Solves the restricted assignment problem described by `node`: rows
    /// `0..prefix.len()` are forced to their prefix columns; the remaining
    /// rows are solved by Hungarian over the remaining columns, with
    /// `forbidden_col` masked off for the first free row.
    fn solve_node(matrix: &CostMatrix, node: &PartitionNode) -> Option<(Vec<usize>, f64)> {
        let n = matrix.size();
        let base = node.prefix.len();
        let used_cols: Vec<usize> = node.prefix.iter().map(|&(_, c)| c).collect();
        let free_cols: Vec<usize> = (0..n).filter(|c| !used_cols.contains(c)).collect();
        let free_rows: Vec<usize> = (base..n).collect();
        if free_rows.is_empty() {
            let cost: f64 = node
                .prefix
                .iter()
                .map(|&(r, c)| matrix.at(r, c))
                .sum();
            let mut columns = vec![0usize; n];
            for &(r, c) in &node.prefix {
                columns[r] = c;
            }
            return Some((columns, cost));
        }

        let m = free_rows.len();
        let mut sub = CostMatrix::new(m);
        for (si, &r) in free_rows.iter().enumerate() {
            for (sj, &c) in free_cols.iter().enumerate() {
                let mut cost = matrix.at(r, c);
                if r == base && c == node.forbidden_col {
                    cost = INFEASIBLE_COST;
                }
                sub.set(si, sj, cost);
            }
        }
        let sub_assignment = HungarianSolver::solve(&sub);
        if sub_assignment.cost >= INFEASIBLE_COST {
            return None;
        }

        let mut columns = vec![0usize; n];
        for &(r, c) in &node.prefix {
            columns[r] = c;
        }
        let mut cost: f64 = node.prefix.iter().map(|&(r, c)| matrix.at(r, c)).sum();
        for (si, &r) in free_rows.iter().enumerate() {
            let c = free_cols[sub_assignment.columns[si]];
            columns[r] = c;
            cost += matrix.at(r, c);
        }
        Some((columns, cost))
    }

    pub fn next_child(&mut self) -> Option<Assignment> {
        let entry = self.frontier.pop()?;
        Self::partition(
            self.matrix,
            &entry.node.prefix,
            &entry.solution,
            &mut self.frontier,
        );
        Some(Assignment {
            columns: entry.solution,
            cost: entry.cost,
        })
    }
}
