//! Core problem-facing types for the optimizer.
//!
//! [`MohoProblem`] is the contract the caller implements to plug a
//! vector-valued objective function into the engine. [`Bounds`] captures
//! the box constraints on positions; [`ParetoSolution`] is one entry of
//! the returned front.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

/// Defines a multi-objective optimization problem.
///
/// The engine only sees objective vectors: what a position *means* is
/// entirely up to the implementation. All objectives are **minimized**;
/// negate a value to maximize it.
///
/// # Purity
///
/// [`evaluate`](MohoProblem::evaluate) must be callable once per candidate
/// with no hidden dependency on call order. The engine may invoke it from
/// multiple rayon workers when parallel execution is enabled, so the
/// implementation must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use moho::MohoProblem;
///
/// /// Bi-objective toy problem: minimize x₀ and maximize x₁.
/// struct Toy;
///
/// impl MohoProblem for Toy {
///     fn n_objectives(&self) -> usize {
///         2
///     }
///
///     fn evaluate(&self, position: &[f64]) -> Vec<f64> {
///         vec![position[0], -position[1]]
///     }
/// }
/// ```
pub trait MohoProblem: Send + Sync {
    /// Number of objective values produced by [`evaluate`](MohoProblem::evaluate).
    fn n_objectives(&self) -> usize;

    /// Scores one position vector. Lower is better on every coordinate.
    ///
    /// Positions passed in are always within the configured bounds.
    /// The returned vector must have length [`n_objectives`](MohoProblem::n_objectives).
    fn evaluate(&self, position: &[f64]) -> Vec<f64>;

    /// Called at the end of each generation with the current Pareto front
    /// size. Observational only; the default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _front_size: usize) {}
}

/// Box constraints on position vectors.
///
/// Either one `[lower, upper]` interval shared by every coordinate, or an
/// interval per coordinate. Callers must keep `lower < upper` elementwise;
/// [`MohoConfig::validate`](crate::MohoConfig::validate) enforces this
/// before a run starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bounds {
    /// The same interval on every coordinate.
    Uniform {
        /// Lower bound for every coordinate.
        lower: f64,
        /// Upper bound for every coordinate.
        upper: f64,
    },

    /// One interval per coordinate; both vectors must match the problem
    /// dimension.
    PerCoordinate {
        /// Per-coordinate lower bounds.
        lower: Vec<f64>,
        /// Per-coordinate upper bounds.
        upper: Vec<f64>,
    },
}

impl Bounds {
    /// The same `[lower, upper]` interval on every coordinate.
    pub fn uniform(lower: f64, upper: f64) -> Self {
        Bounds::Uniform { lower, upper }
    }

    /// Independent bounds per coordinate.
    pub fn per_coordinate(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Bounds::PerCoordinate { lower, upper }
    }

    /// Lower bound for coordinate `coord`.
    pub fn lower(&self, coord: usize) -> f64 {
        match self {
            Bounds::Uniform { lower, .. } => *lower,
            Bounds::PerCoordinate { lower, .. } => lower[coord],
        }
    }

    /// Upper bound for coordinate `coord`.
    pub fn upper(&self, coord: usize) -> f64 {
        match self {
            Bounds::Uniform { upper, .. } => *upper,
            Bounds::PerCoordinate { upper, .. } => upper[coord],
        }
    }

    /// Clamps every coordinate of `position` into its interval.
    ///
    /// Applied to every candidate immediately after an update, before it
    /// reaches the evaluator or the stored population.
    pub(crate) fn clamp(&self, position: &mut [f64]) {
        for (coord, x) in position.iter_mut().enumerate() {
            *x = x.clamp(self.lower(coord), self.upper(coord));
        }
    }

    /// Draws a uniform random position within bounds.
    pub(crate) fn sample<R: Rng>(&self, dimension: usize, rng: &mut R) -> Vec<f64> {
        (0..dimension)
            .map(|coord| rng.random_range(self.lower(coord)..self.upper(coord)))
            .collect()
    }
}

/// One member of a returned Pareto front: a position vector together with
/// the objective vector it scored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParetoSolution {
    /// Position in decision space, within the configured bounds.
    pub position: Vec<f64>,

    /// Objective values of the position (minimization convention).
    pub objectives: Vec<f64>,
}
