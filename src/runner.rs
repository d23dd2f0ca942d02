//! Generational loop execution.
//!
//! [`MohoRunner`] orchestrates the complete run: initialization →
//! (offspring copy → exploration → defense → escape → environmental
//! selection → re-rank) × `max_gen` → extraction of the final rank-1
//! front.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{ConfigError, MohoConfig};
use crate::phases::{defense, escape, exploration, PhaseContext};
use crate::population::Population;
use crate::selection::environmental_selection;
use crate::types::{MohoProblem, ParetoSolution};

/// Result of a MOHO optimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MohoResult {
    /// The final Pareto front: every rank-1 individual of the last
    /// generation. Non-empty, at most `pop_size` entries, pairwise
    /// mutually non-dominated.
    pub front: Vec<ParetoSolution>,

    /// Number of generations executed (always `max_gen`).
    pub generations: usize,

    /// Rank-1 front size at the end of each generation.
    pub front_history: Vec<usize>,
}

/// Executes the MOHO generational loop.
///
/// # Usage
///
/// ```
/// use moho::{Bounds, MohoConfig, MohoProblem, MohoRunner};
///
/// struct Toy;
///
/// impl MohoProblem for Toy {
///     fn n_objectives(&self) -> usize {
///         2
///     }
///     fn evaluate(&self, position: &[f64]) -> Vec<f64> {
///         vec![position[0], -position[1]]
///     }
/// }
///
/// let config = MohoConfig::new(4, Bounds::uniform(0.0, 1.0))
///     .with_pop_size(6)
///     .with_max_gen(3)
///     .with_seed(42);
/// let result = MohoRunner::run(&Toy, &config).unwrap();
/// assert!(!result.front.is_empty());
/// ```
pub struct MohoRunner;

impl MohoRunner {
    /// Runs the optimization.
    ///
    /// Validates the configuration before any work happens; a malformed
    /// configuration is reported as [`ConfigError`], never discovered
    /// mid-run. Given a fixed `seed` and a deterministic problem, two
    /// runs produce identical fronts.
    pub fn run<P: MohoProblem>(
        problem: &P,
        config: &MohoConfig,
    ) -> Result<MohoResult, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        // Initialize and rank the parent population
        let mut parent = Population::sample_uniform(
            config.pop_size,
            config.dimension,
            &config.bounds,
            &mut rng,
        );
        evaluate_population(problem, &mut parent, config.parallel);
        parent.update_ranks();

        let mut front_history = Vec::with_capacity(config.max_gen);

        for generation in 1..=config.max_gen {
            // Offspring starts as a value copy of the parent
            let mut offspring = parent.clone();

            let mut leaders = parent.first_front_indices();
            if leaders.is_empty() {
                // Degenerate ranking: fall back to the whole population
                leaders = (0..config.pop_size).collect();
            }

            let ctx = PhaseContext {
                problem,
                bounds: &config.bounds,
                generation,
                max_gen: config.max_gen,
            };

            let seeds = draw_seeds(config.pop_size, &mut rng);
            exploration(&ctx, &parent, &mut offspring, &leaders, &seeds, config.parallel);

            let seeds = draw_seeds(config.pop_size, &mut rng);
            defense(&ctx, &parent, &mut offspring, &seeds, config.parallel);

            let seeds = draw_seeds(config.pop_size, &mut rng);
            escape(&ctx, &mut offspring, &seeds, config.parallel);

            parent = environmental_selection(&parent, &offspring);
            parent.update_ranks();

            let front_size = parent.first_front_indices().len();
            front_history.push(front_size);
            debug!(
                "generation {}/{}: pareto front size {}",
                generation, config.max_gen, front_size
            );
            problem.on_generation(generation, front_size);
        }

        let front = parent
            .first_front_indices()
            .into_iter()
            .map(|i| ParetoSolution {
                position: parent.position(i).to_vec(),
                objectives: parent.score(i).to_vec(),
            })
            .collect();

        Ok(MohoResult {
            front,
            generations: config.max_gen,
            front_history,
        })
    }
}

/// One independent random stream seed per population slot, drawn from
/// the master stream so the whole run stays reproducible.
fn draw_seeds(pop_size: usize, rng: &mut StdRng) -> Vec<u64> {
    (0..pop_size).map(|_| rng.random()).collect()
}

/// Scores every slot of a population.
fn evaluate_population<P: MohoProblem>(problem: &P, population: &mut Population, parallel: bool) {
    let len = population.len();
    if parallel {
        population.par_slots_mut(0..len).for_each(|(_, pos, score)| {
            *score = problem.evaluate(pos);
        });
    } else {
        for (_, pos, score) in population.slots_mut(0..len) {
            *score = problem.evaluate(pos);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi_objective::{dominance_cmp, Dominance};
    use crate::types::Bounds;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Toy;

    impl MohoProblem for Toy {
        fn n_objectives(&self) -> usize {
            2
        }
        fn evaluate(&self, position: &[f64]) -> Vec<f64> {
            vec![position[0], -position[1]]
        }
    }

    fn toy_config() -> MohoConfig {
        MohoConfig::new(4, Bounds::uniform(0.0, 1.0))
            .with_pop_size(6)
            .with_max_gen(3)
            .with_seed(42)
    }

    #[test]
    fn test_toy_run_returns_valid_front() {
        let result = MohoRunner::run(&Toy, &toy_config()).unwrap();

        assert!(!result.front.is_empty());
        assert!(result.front.len() <= 6);
        assert_eq!(result.generations, 3);

        for sol in &result.front {
            assert_eq!(sol.position.len(), 4);
            assert_eq!(sol.objectives.len(), 2);
            assert!(sol.position.iter().all(|&x| (0.0..=1.0).contains(&x)));
            assert_eq!(sol.objectives, Toy.evaluate(&sol.position));
        }

        // Every returned pair is mutually non-dominated
        for a in &result.front {
            for b in &result.front {
                assert_eq!(
                    dominance_cmp(&a.objectives, &b.objectives),
                    Dominance::Neither
                );
            }
        }
    }

    #[test]
    fn test_front_history_length_and_bounds() {
        let result = MohoRunner::run(&Toy, &toy_config()).unwrap();
        assert_eq!(result.front_history.len(), 3);
        assert!(result.front_history.iter().all(|&n| n >= 1 && n <= 6));
        assert_eq!(*result.front_history.last().unwrap(), result.front.len());
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let a = MohoRunner::run(&Toy, &toy_config()).unwrap();
        let b = MohoRunner::run(&Toy, &toy_config()).unwrap();
        assert_eq!(a.front, b.front);
        assert_eq!(a.front_history, b.front_history);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let sequential = MohoRunner::run(&Toy, &toy_config()).unwrap();
        let parallel = MohoRunner::run(&Toy, &toy_config().with_parallel(true)).unwrap();
        assert_eq!(sequential.front, parallel.front);
        assert_eq!(sequential.front_history, parallel.front_history);
    }

    #[test]
    fn test_invalid_config_is_rejected_eagerly() {
        let config = toy_config().with_pop_size(5);
        assert_eq!(
            MohoRunner::run(&Toy, &config).unwrap_err(),
            ConfigError::InvalidPopSize(5)
        );
    }

    #[test]
    fn test_on_generation_called_once_per_generation() {
        struct Counting(AtomicUsize);

        impl MohoProblem for Counting {
            fn n_objectives(&self) -> usize {
                2
            }
            fn evaluate(&self, position: &[f64]) -> Vec<f64> {
                vec![position[0], -position[1]]
            }
            fn on_generation(&self, _generation: usize, front_size: usize) {
                assert!(front_size >= 1);
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let problem = Counting(AtomicUsize::new(0));
        MohoRunner::run(&problem, &toy_config().with_max_gen(5)).unwrap();
        assert_eq!(problem.0.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_front_approaches_ideal_corner() {
        // With f = (x₀, -x₁) the ideal sits at x₀ → 0, x₁ → 1. After a
        // longer run, at least one solution should be near the best
        // value on each objective.
        let config = MohoConfig::new(4, Bounds::uniform(0.0, 1.0))
            .with_pop_size(20)
            .with_max_gen(30)
            .with_seed(7);
        let result = MohoRunner::run(&Toy, &config).unwrap();

        let best_f0 = result
            .front
            .iter()
            .map(|s| s.objectives[0])
            .fold(f64::INFINITY, f64::min);
        let best_f1 = result
            .front
            .iter()
            .map(|s| s.objectives[1])
            .fold(f64::INFINITY, f64::min);
        assert!(best_f0 < 0.2, "expected x0 near 0, best objective {best_f0}");
        assert!(best_f1 < -0.8, "expected x1 near 1, best objective {best_f1}");
    }

    #[test]
    fn test_per_coordinate_bounds_respected() {
        let bounds = Bounds::per_coordinate(vec![0.0, -2.0, 5.0], vec![1.0, -1.0, 6.0]);
        let config = MohoConfig::new(3, bounds)
            .with_pop_size(8)
            .with_max_gen(4)
            .with_seed(3);

        struct Sum;
        impl MohoProblem for Sum {
            fn n_objectives(&self) -> usize {
                2
            }
            fn evaluate(&self, position: &[f64]) -> Vec<f64> {
                let s: f64 = position.iter().sum();
                vec![s, -s]
            }
        }

        let result = MohoRunner::run(&Sum, &config).unwrap();
        for sol in &result.front {
            assert!((0.0..=1.0).contains(&sol.position[0]));
            assert!((-2.0..=-1.0).contains(&sol.position[1]));
            assert!((5.0..=6.0).contains(&sol.position[2]));
        }
    }
}
