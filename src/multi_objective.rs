//! Pareto dominance, non-dominated sorting, and crowding distance.
//!
//! The ranking machinery shared by the movement phases (dominance-gated
//! acceptance) and by environmental selection (front-wise survival).
//! All objectives are **minimized**: lower values are better.
//!
//! # Algorithms
//!
//! - [`dominance_cmp`]: pairwise Pareto comparison
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: density estimate within a single front
//! - [`rank_population`]: sort + per-front crowding for a whole population
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

/// Outcome of a pairwise Pareto dominance comparison.
///
/// Antisymmetric by construction: swapping the arguments of
/// [`dominance_cmp`] maps `First` to `Second` and vice versa, and
/// leaves `Neither` unchanged (see [`Dominance::flip`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// The first vector weakly dominates the second.
    First,
    /// The second vector weakly dominates the first.
    Second,
    /// Mutually non-dominated (including equal vectors).
    Neither,
}

impl Dominance {
    /// The result of comparing the same pair with swapped arguments.
    pub fn flip(self) -> Self {
        match self {
            Dominance::First => Dominance::Second,
            Dominance::Second => Dominance::First,
            Dominance::Neither => Dominance::Neither,
        }
    }
}

/// Compares two objective vectors for Pareto dominance (minimization).
///
/// A vector dominates another when it is at least as good on every
/// coordinate and strictly better on at least one. Equal vectors are
/// mutually non-dominated.
///
/// # Example
///
/// ```
/// use moho::multi_objective::{dominance_cmp, Dominance};
///
/// assert_eq!(dominance_cmp(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]), Dominance::First);
/// assert_eq!(dominance_cmp(&[1.0, 5.0], &[5.0, 1.0]), Dominance::Neither);
/// ```
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::First,
        (false, true) => Dominance::Second,
        _ => Dominance::Neither,
    }
}

/// Result of non-dominated sorting.
///
/// Ranks are 1-based: rank 1 is the Pareto front. `fronts[0]` holds the
/// rank-1 indices, `fronts[1]` the rank-2 indices, and so on.
#[derive(Debug, Clone)]
pub struct SortResult {
    /// Pareto rank for each solution (1 = non-dominated front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front, in increasing rank order.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution by domination-count peeling:
/// solutions dominated by nobody form front 1; removing a front
/// decrements the domination counts of everything its members dominate,
/// and freshly zeroed counts form the next front.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions.
///
/// # Panics
///
/// Panics if `objectives` is empty or its rows have inconsistent lengths.
///
/// # Example
///
/// ```
/// use moho::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // dominated by [3.0, 3.0]
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![1, 1, 1, 2]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> SortResult {
    let n = objectives.len();
    assert!(n > 0, "objectives must not be empty");

    if n == 1 {
        return SortResult {
            ranks: vec![1],
            fronts: vec![vec![0]],
        };
    }

    let m = objectives[0].len();
    assert!(m > 0, "each solution must have at least one objective");
    debug_assert!(
        objectives.iter().all(|o| o.len() == m),
        "all objective vectors must have the same length"
    );

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_1 = Vec::new();

    // Compute dominance relationships
    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::First => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Second => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        if domination_count[i] == 0 {
            ranks[i] = 1;
            front_1.push(i);
        }
    }

    // Peel subsequent fronts
    let mut fronts = vec![front_1];
    loop {
        let current = fronts.last().expect("fronts is initialized with front_1; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    SortResult { ranks, fronts }
}

/// Crowding distance within a single front.
///
/// Measures how isolated each solution is in objective space; higher
/// distance means more isolated. Used as the sole tie-break when
/// environmental selection has to split a front.
///
/// Fronts of size ≤ 2 get `f64::INFINITY` for every member: boundary
/// solutions are always preserved, never pruned by density. For larger
/// fronts, each objective coordinate sorts the members, gives the two
/// extremes infinity, and adds the normalized neighbor gap to each
/// interior member. A coordinate whose range across the front is zero
/// contributes nothing (skipped entirely, avoiding division by zero).
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = front size.
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n == 0 {
        return Vec::new();
    }
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let min_val = objectives[order[0]][obj_idx];
        let max_val = objectives[order[n - 1]][obj_idx];
        let range = max_val - min_val;

        // Degenerate coordinate: no contribution, not even boundary infinity
        if range == 0.0 {
            continue;
        }

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        for k in 1..(n - 1) {
            let prev = objectives[order[k - 1]][obj_idx];
            let next = objectives[order[k + 1]][obj_idx];
            distances[order[k]] += (next - prev) / range;
        }
    }

    distances
}

/// Combined ranking of a whole population: non-dominated sort plus
/// crowding distance computed independently per front.
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Pareto rank per solution (1 = non-dominated front).
    pub ranks: Vec<usize>,

    /// Crowding distance per solution, computed within its front.
    pub crowding: Vec<f64>,

    /// Indices grouped by front, in increasing rank order.
    pub fronts: Vec<Vec<usize>>,
}

/// Ranks a population and assigns per-front crowding distances.
///
/// This is the annotation pass run on the parent population at the start
/// of every generation (for leader selection) and on the merged pool
/// inside environmental selection.
pub fn rank_population(objectives: &[Vec<f64>]) -> Ranking {
    let sorted = non_dominated_sort(objectives);
    let mut crowding = vec![0.0f64; objectives.len()];

    for front in &sorted.fronts {
        let rows: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&rows)) {
            crowding[i] = d;
        }
    }

    Ranking {
        ranks: sorted.ranks,
        crowding,
        fronts: sorted.fronts,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ---- Dominance ----

    #[test]
    fn test_clear_dominance() {
        assert_eq!(
            dominance_cmp(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]),
            Dominance::First
        );
        assert_eq!(
            dominance_cmp(&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]),
            Dominance::Second
        );
    }

    #[test]
    fn test_mutual_non_domination() {
        assert_eq!(dominance_cmp(&[1.0, 5.0], &[5.0, 1.0]), Dominance::Neither);
    }

    #[test]
    fn test_equal_vectors_do_not_dominate() {
        assert_eq!(dominance_cmp(&[2.0, 2.0], &[2.0, 2.0]), Dominance::Neither);
    }

    #[test]
    fn test_weak_dominance_single_strict_coordinate() {
        // Equal everywhere except one strictly better coordinate
        assert_eq!(
            dominance_cmp(&[1.0, 2.0], &[1.0, 3.0]),
            Dominance::First
        );
    }

    proptest! {
        #[test]
        fn prop_antisymmetry(
            a in proptest::collection::vec(-1e6f64..1e6, 1..6),
            b in proptest::collection::vec(-1e6f64..1e6, 1..6),
        ) {
            let len = a.len().min(b.len());
            let (a, b) = (&a[..len], &b[..len]);
            prop_assert_eq!(dominance_cmp(a, b), dominance_cmp(b, a).flip());
        }

        #[test]
        fn prop_self_comparison_is_neither(
            a in proptest::collection::vec(-1e6f64..1e6, 1..6),
        ) {
            prop_assert_eq!(dominance_cmp(&a, &a), Dominance::Neither);
        }
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_single_solution() {
        let objs = vec![vec![1.0, 2.0]];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![1]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_two_non_dominated() {
        let objs = vec![vec![1.0, 3.0], vec![3.0, 1.0]];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![1, 1]);
        assert_eq!(result.fronts.len(), 1);
    }

    #[test]
    fn test_chain_of_dominance() {
        let objs = vec![
            vec![1.0, 1.0], // dominates all
            vec![2.0, 2.0], // dominated by 0
            vec![3.0, 3.0], // dominated by 0 and 1
        ];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![1, 2, 3]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            vec![1.0, 5.0], // front 1
            vec![3.0, 3.0], // front 1
            vec![5.0, 1.0], // front 1
            vec![4.0, 4.0], // dominated by [1] → front 2
            vec![6.0, 6.0], // dominated by (4,4) as well → front 3
        ];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![1, 1, 1, 2, 3]);
    }

    #[test]
    fn test_all_mutually_non_dominated_is_one_front() {
        // Front-1 closure: pairwise non-dominated population → all rank 1
        let objs = vec![
            vec![1.0, 5.0, 3.0],
            vec![3.0, 1.0, 5.0],
            vec![5.0, 3.0, 1.0],
            vec![4.0, 4.0, 4.0],
        ];
        let result = non_dominated_sort(&objs);
        assert!(result.ranks.iter().all(|&r| r == 1));
        assert_eq!(result.fronts.len(), 1);
    }

    #[test]
    fn test_all_equal_is_one_front() {
        let objs = vec![vec![2.0, 2.0]; 3];
        let result = non_dominated_sort(&objs);
        assert!(result.ranks.iter().all(|&r| r == 1));
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_small_fronts_are_infinite() {
        assert!(crowding_distance(&[vec![1.0, 2.0]])
            .iter()
            .all(|d| d.is_infinite()));
        assert!(crowding_distance(&[vec![1.0, 3.0], vec![3.0, 1.0]])
            .iter()
            .all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_boundary_and_interior() {
        let objs = vec![
            vec![1.0, 5.0], // boundary
            vec![3.0, 3.0], // interior
            vec![5.0, 1.0], // boundary
        ];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!(dist[1].is_finite());
        assert!(dist[1] > 0.0);
    }

    #[test]
    fn test_crowding_single_objective_gaps() {
        // Values [0, 1, 2, 10]: boundaries infinite, interior normalized gaps
        let objs = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[3].is_infinite());
        assert!((dist[1] - 0.2).abs() < 1e-12, "got {}", dist[1]);
        assert!((dist[2] - 0.9).abs() < 1e-12, "got {}", dist[2]);
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        assert!((dist[1] - dist[2]).abs() < 1e-10);
        assert!((dist[2] - dist[3]).abs() < 1e-10);
    }

    #[test]
    fn test_crowding_zero_range_objective_skipped() {
        // Second coordinate is constant: only the first contributes
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!(dist[1].is_finite());
    }

    #[test]
    fn test_crowding_all_coordinates_degenerate() {
        // Identical points in a front of 3: every coordinate skipped,
        // distances stay at zero rather than infinity
        let objs = vec![vec![5.0, 5.0]; 3];
        let dist = crowding_distance(&objs);
        assert_eq!(dist, vec![0.0, 0.0, 0.0]);
    }

    // ---- Combined ranking ----

    #[test]
    fn test_rank_population_per_front_crowding() {
        let objs = vec![
            vec![1.0, 5.0], // front 1
            vec![3.0, 3.0], // front 1
            vec![5.0, 1.0], // front 1
            vec![4.0, 4.0], // front 2
            vec![6.0, 6.0], // front 3
        ];
        let ranking = rank_population(&objs);
        assert_eq!(ranking.ranks, vec![1, 1, 1, 2, 3]);

        // Front 1: boundaries infinite, interior finite
        assert!(ranking.crowding[0].is_infinite());
        assert!(ranking.crowding[1].is_finite());
        assert!(ranking.crowding[2].is_infinite());

        // Singleton fronts get infinity
        assert!(ranking.crowding[3].is_infinite());
        assert!(ranking.crowding[4].is_infinite());
    }
}
