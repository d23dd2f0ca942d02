//! Multi-objective hippopotamus optimizer (MOHO).
//!
//! A population-based multi-objective metaheuristic that evolves a set of
//! candidate solutions toward a Pareto-optimal trade-off surface. It
//! combines an NSGA-II-style elitist generational model (fast
//! non-dominated sorting, crowding distance, merge/sort/select survival)
//! with the three movement phases of the hippopotamus optimization
//! algorithm (exploration, defense, escape) as its variation operators,
//! each gated by Pareto dominance when writing into the offspring buffer.
//!
//! The objective function is pluggable: implement [`MohoProblem`] for any
//! deterministic or stochastic vector-valued scoring of a position vector.
//! All objectives are minimized.
//!
//! # Quick start
//!
//! ```
//! use moho::{Bounds, MohoConfig, MohoProblem, MohoRunner};
//!
//! /// Minimize x₀ while maximizing x₁.
//! struct Toy;
//!
//! impl MohoProblem for Toy {
//!     fn n_objectives(&self) -> usize {
//!         2
//!     }
//!     fn evaluate(&self, position: &[f64]) -> Vec<f64> {
//!         vec![position[0], -position[1]]
//!     }
//! }
//!
//! let config = MohoConfig::new(4, Bounds::uniform(0.0, 1.0))
//!     .with_pop_size(10)
//!     .with_max_gen(20)
//!     .with_seed(42);
//!
//! let result = MohoRunner::run(&Toy, &config).unwrap();
//! assert!(!result.front.is_empty());
//! ```
//!
//! # Determinism
//!
//! Given a fixed seed and a deterministic problem, two runs produce
//! identical fronts, including under [`MohoConfig::with_parallel`],
//! because every population slot draws from its own seeded random stream.
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Amiri et al. (2024), *Hippopotamus optimization algorithm*
//! - Mantegna (1994), *Fast, accurate algorithm for numerical simulation
//!   of Lévy stable stochastic processes*

mod compromise;
mod config;
mod levy;
pub mod multi_objective;
mod phases;
mod population;
mod runner;
mod selection;
mod types;

pub use compromise::select_best_compromise;
pub use config::{ConfigError, MohoConfig};
pub use runner::{MohoResult, MohoRunner};
pub use types::{Bounds, MohoProblem, ParetoSolution};
