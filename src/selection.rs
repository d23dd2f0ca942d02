//! Elitist environmental selection.
//!
//! Parent and offspring are merged into a transient 2×pop pool, the pool
//! is re-ranked, and survivors are taken front by front. Whole fronts
//! copy over while they fit; the front that would overflow is truncated
//! by crowding distance, keeping the most isolated members. Crowding is
//! the sole tie-break.

use crate::multi_objective::rank_population;
use crate::population::Population;

/// Selects the next parent generation from a parent/offspring pair.
///
/// Returns exactly `parent.len()` survivors (the merged pool always has
/// twice that many candidates). Ranks and crowding on the returned
/// population are unassigned; the caller re-ranks it for the next
/// generation's leader selection.
pub(crate) fn environmental_selection(parent: &Population, offspring: &Population) -> Population {
    let pop_size = parent.len();
    let pool = parent.merge(offspring);
    let ranking = rank_population(pool.scores());

    let mut survivors: Vec<usize> = Vec::with_capacity(pop_size);
    for front in &ranking.fronts {
        let remaining = pop_size - survivors.len();
        if remaining == 0 {
            break;
        }

        if front.len() <= remaining {
            survivors.extend_from_slice(front);
        } else {
            // Split front: keep the most isolated members
            let mut by_isolation = front.clone();
            by_isolation.sort_by(|&a, &b| {
                ranking.crowding[b]
                    .partial_cmp(&ranking.crowding[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            survivors.extend_from_slice(&by_isolation[..remaining]);
        }
    }

    pool.gather(&survivors)
}
