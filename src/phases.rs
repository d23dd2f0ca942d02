//! The three movement phases of the optimizer.
//!
//! Each generation the population halves take different roles: the first
//! half explores around the current Pareto front leaders, the second half
//! defends against a randomly placed predator with Levy-flight steps, and
//! finally the whole offspring population attempts an escape move inside
//! generation-shrunken local bounds.
//!
//! Every candidate position is clipped into bounds, evaluated, and
//! accepted into its offspring slot iff the new objective vector is not
//! dominated by whatever the slot currently holds. The lenient rule
//! (accept on dominance *or* incomparability) is load-bearing: it permits
//! non-improving drift along the front and must not be tightened to
//! strict dominance.
//!
//! Each slot draws from its own seeded random stream, so a phase produces
//! identical results whether it runs sequentially or across the rayon
//! worker pool.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::levy::levy_step;
use crate::multi_objective::{dominance_cmp, Dominance};
use crate::population::Population;
use crate::types::{Bounds, MohoProblem};

/// Stability parameter of the defense phase's Levy step.
const LEVY_BETA: f64 = 1.5;

/// Scale applied to the raw Levy step.
const LEVY_SCALE: f64 = 0.05;

/// Keeps the inverse-distance term finite when a coordinate of the
/// predator coincides with the individual's position.
const DISTANCE_EPS: f64 = 1e-6;

/// Shared per-generation inputs for the movement phases.
pub(crate) struct PhaseContext<'a, P: MohoProblem> {
    pub problem: &'a P,
    pub bounds: &'a Bounds,
    /// Current generation, 1-indexed.
    pub generation: usize,
    pub max_gen: usize,
}

/// Clips, evaluates, and conditionally installs a candidate into an
/// offspring slot.
///
/// The comparison runs against the slot's *current* score: a candidate
/// accepted earlier in the same generation raises the bar for the next
/// one targeting the same slot.
fn accept_if_not_dominated<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    mut candidate: Vec<f64>,
    pos: &mut [f64],
    score: &mut Vec<f64>,
) {
    ctx.bounds.clamp(&mut candidate);
    let new_score = ctx.problem.evaluate(&candidate);
    debug_assert_eq!(new_score.len(), ctx.problem.n_objectives());
    if dominance_cmp(&new_score, score) != Dominance::Second {
        pos.copy_from_slice(&candidate);
        *score = new_score;
    }
}

/// Exploration phase over slots `[0, pop_size/2)`.
///
/// `leaders` are the parent's rank-1 indices (or the whole index set when
/// the first front is empty). Two candidates are tried per slot, in
/// order: a drift toward a random leader, then a group-mean move whose
/// form depends on the time factor `exp(-t/max_gen)`.
pub(crate) fn exploration<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    parent: &Population,
    offspring: &mut Population,
    leaders: &[usize],
    seeds: &[u64],
    parallel: bool,
) {
    let half = parent.len() / 2;
    if parallel {
        offspring.par_slots_mut(0..half).for_each(|(slot, pos, score)| {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            explore_slot(ctx, parent, leaders, slot, pos, score, &mut rng);
        });
    } else {
        for (slot, pos, score) in offspring.slots_mut(0..half) {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            explore_slot(ctx, parent, leaders, slot, pos, score, &mut rng);
        }
    }
}

fn explore_slot<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    parent: &Population,
    leaders: &[usize],
    slot: usize,
    pos: &mut [f64],
    score: &mut Vec<f64>,
    rng: &mut StdRng,
) {
    let dim = parent.dimension();
    let leader = parent.position(leaders[rng.random_range(0..leaders.len())]);

    // Integer multipliers from {1, 2}
    let m1 = rng.random_range(1..3) as f64;
    let m2 = rng.random_range(1..3) as f64;

    // Mean position over a random-size subset of distinct parent slots
    let subset_size = rng.random_range(1..=parent.len());
    let mut group_mean = vec![0.0f64; dim];
    for idx in rand::seq::index::sample(rng, parent.len(), subset_size) {
        for (acc, &x) in group_mean.iter_mut().zip(parent.position(idx)) {
            *acc += x;
        }
    }
    for acc in &mut group_mean {
        *acc /= subset_size as f64;
    }

    let vec_a: Vec<f64> = (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect();
    let vec_b: Vec<f64> = (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect();

    let base = parent.position(slot);

    // Candidate A: drift toward the chosen leader
    let r = rng.random::<f64>();
    let candidate_a: Vec<f64> = base
        .iter()
        .zip(leader)
        .map(|(&x, &ld)| x + r * (ld - m1 * x))
        .collect();
    accept_if_not_dominated(ctx, candidate_a, pos, score);

    // Candidate B: early generations orbit leader vs. group mean; later
    // ones either drift off the mean or restart uniformly at random
    let time_factor = (-(ctx.generation as f64) / ctx.max_gen as f64).exp();
    let candidate_b: Vec<f64> = if time_factor > 0.6 {
        (0..dim)
            .map(|j| base[j] + vec_a[j] * (leader[j] - m2 * group_mean[j]))
            .collect()
    } else if rng.random::<f64>() > 0.5 {
        (0..dim)
            .map(|j| base[j] + vec_b[j] * (group_mean[j] - leader[j]))
            .collect()
    } else {
        ctx.bounds.sample(dim, rng)
    };
    accept_if_not_dominated(ctx, candidate_b, pos, score);
}

/// Defense phase over slots `[pop_size/2, pop_size)`.
///
/// Each individual reacts to a uniformly random predator position with a
/// Levy-flight step modulated by an inverse-distance repulsion term.
pub(crate) fn defense<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    parent: &Population,
    offspring: &mut Population,
    seeds: &[u64],
    parallel: bool,
) {
    let half = parent.len() / 2;
    let len = parent.len();
    if parallel {
        offspring.par_slots_mut(half..len).for_each(|(slot, pos, score)| {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            defense_slot(ctx, parent, slot, pos, score, &mut rng);
        });
    } else {
        for (slot, pos, score) in offspring.slots_mut(half..len) {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            defense_slot(ctx, parent, slot, pos, score, &mut rng);
        }
    }
}

fn defense_slot<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    parent: &Population,
    slot: usize,
    pos: &mut [f64],
    score: &mut Vec<f64>,
    rng: &mut StdRng,
) {
    let dim = parent.dimension();
    let predator = ctx.bounds.sample(dim, rng);
    let base = parent.position(slot);
    let distance: Vec<f64> = predator
        .iter()
        .zip(base)
        .map(|(&p, &x)| (p - x).abs())
        .collect();

    let levy = levy_step(dim, LEVY_BETA, rng);

    let b = rng.random_range(2.0..4.0);
    let c = rng.random_range(1.0..1.5);
    let d = rng.random_range(2.0..3.0);
    let angle = rng.random_range(-std::f64::consts::TAU..std::f64::consts::TAU);
    let repulsion = b / (c - d * angle.cos());

    let candidate: Vec<f64> = (0..dim)
        .map(|j| LEVY_SCALE * levy[j] * predator[j] + repulsion / (distance[j] + DISTANCE_EPS))
        .collect();
    accept_if_not_dominated(ctx, candidate, pos, score);
}

/// Escape phase over all slots, operating on the offspring in place.
///
/// Local bounds shrink with the 1-indexed generation number (`lb/t`,
/// `ub/t`), intensifying the contraction as the run progresses.
pub(crate) fn escape<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    offspring: &mut Population,
    seeds: &[u64],
    parallel: bool,
) {
    let len = offspring.len();
    if parallel {
        offspring.par_slots_mut(0..len).for_each(|(slot, pos, score)| {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            escape_slot(ctx, pos, score, &mut rng);
        });
    } else {
        for (slot, pos, score) in offspring.slots_mut(0..len) {
            let mut rng = StdRng::seed_from_u64(seeds[slot]);
            escape_slot(ctx, pos, score, &mut rng);
        }
    }
}

fn escape_slot<P: MohoProblem>(
    ctx: &PhaseContext<'_, P>,
    pos: &mut [f64],
    score: &mut Vec<f64>,
    rng: &mut StdRng,
) {
    let dim = pos.len();
    let t = ctx.generation as f64;

    let dvec: Vec<f64> = (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect();
    let r = rng.random::<f64>();

    let candidate: Vec<f64> = pos
        .iter()
        .enumerate()
        .map(|(j, &x)| {
            let lo = ctx.bounds.lower(j) / t;
            let hi = ctx.bounds.upper(j) / t;
            x + r * (lo + dvec[j] * (hi - lo))
        })
        .collect();
    accept_if_not_dominated(ctx, candidate, pos, score);
}

// ============================================================================
// Tests
// ============================================================================
