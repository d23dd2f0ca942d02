//! Best-compromise selection over a returned Pareto front.
//!
//! Post-hoc glue for callers who need a single answer out of a front:
//! the "normalized absolute deviation" rule picks the solution whose
//! normalized objective vector sits closest to the front's mean. The
//! optimization core never calls this.

use crate::types::ParetoSolution;

/// Picks the best-compromise solution from a Pareto front.
///
/// Each objective column is normalized to `[0, 1]` across the front
/// (columns with zero range contribute zero deviation), then each
/// solution is scored by the mean absolute deviation of its normalized
/// objectives from the front's normalized mean. The index of the
/// lowest-deviation solution is returned.
///
/// Returns `None` for an empty front.
pub fn select_best_compromise(front: &[ParetoSolution]) -> Option<usize> {
    if front.is_empty() {
        return None;
    }
    if front.len() == 1 {
        return Some(0);
    }

    let n_obj = front[0].objectives.len();
    let n = front.len();

    let mut min_vals = vec![f64::INFINITY; n_obj];
    let mut max_vals = vec![f64::NEG_INFINITY; n_obj];
    for sol in front {
        for (m, &v) in sol.objectives.iter().enumerate() {
            min_vals[m] = min_vals[m].min(v);
            max_vals[m] = max_vals[m].max(v);
        }
    }
    let ranges: Vec<f64> = min_vals
        .iter()
        .zip(&max_vals)
        .map(|(&lo, &hi)| if hi > lo { hi - lo } else { 1.0 })
        .collect();

    let normalized: Vec<Vec<f64>> = front
        .iter()
        .map(|sol| {
            sol.objectives
                .iter()
                .enumerate()
                .map(|(m, &v)| (v - min_vals[m]) / ranges[m])
                .collect()
        })
        .collect();

    let mean: Vec<f64> = (0..n_obj)
        .map(|m| normalized.iter().map(|row| row[m]).sum::<f64>() / n as f64)
        .collect();

    let deviation = |row: &[f64]| -> f64 {
        row.iter()
            .zip(&mean)
            .map(|(&v, &mu)| (v - mu).abs())
            .sum::<f64>()
            / n_obj as f64
    };

    normalized
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            deviation(a)
                .partial_cmp(&deviation(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(objectives: Vec<f64>) -> ParetoSolution {
        ParetoSolution {
            position: Vec::new(),
            objectives,
        }
    }

    #[test]
    fn test_empty_front() {
        assert_eq!(select_best_compromise(&[]), None);
    }

    #[test]
    fn test_singleton_front() {
        let front = [solution(vec![1.0, 2.0])];
        assert_eq!(select_best_compromise(&front), Some(0));
    }

    #[test]
    fn test_picks_central_solution() {
        // The middle point of a symmetric front is closest to the mean
        let front = [
            solution(vec![0.0, 4.0]),
            solution(vec![2.0, 2.0]),
            solution(vec![4.0, 0.0]),
        ];
        assert_eq!(select_best_compromise(&front), Some(1));
    }

    #[test]
    fn test_degenerate_column_does_not_divide_by_zero() {
        let front = [
            solution(vec![0.0, 7.0]),
            solution(vec![1.0, 7.0]),
            solution(vec![2.0, 7.0]),
        ];
        // Second column has zero range; choice driven by the first only
        assert_eq!(select_best_compromise(&front), Some(1));
    }
}
