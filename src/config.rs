//! Optimizer configuration.
//!
//! [`MohoConfig`] holds the problem geometry (dimension, bounds) and the
//! parameters that control the generational loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Bounds;

/// A configuration precondition violation, reported eagerly by
/// [`MohoConfig::validate`] before any optimization work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `dimension` must be a positive integer.
    #[error("dimension must be positive")]
    ZeroDimension,

    /// `pop_size` must be an even integer of at least 4 so the
    /// exploration/defense split is well-defined.
    #[error("pop_size must be an even number >= 4, got {0}")]
    InvalidPopSize(usize),

    /// `max_gen` must be at least 1.
    #[error("max_gen must be at least 1")]
    ZeroGenerations,

    /// Per-coordinate bounds must match the problem dimension.
    #[error("bounds have {got} coordinates but dimension is {dimension}")]
    BoundsLengthMismatch {
        /// Number of coordinates in the offending bounds vector.
        got: usize,
        /// Configured problem dimension.
        dimension: usize,
    },

    /// Every coordinate needs `lower < upper`.
    #[error("invalid interval at coordinate {coord}: lower {lower} >= upper {upper}")]
    InvertedBounds {
        /// Offending coordinate index (0 for uniform bounds).
        coord: usize,
        /// Lower bound at that coordinate.
        lower: f64,
        /// Upper bound at that coordinate.
        upper: f64,
    },
}

/// Configuration for a MOHO run.
///
/// # Builder Pattern
///
/// ```
/// use moho::{Bounds, MohoConfig};
///
/// let config = MohoConfig::new(240, Bounds::uniform(0.0, 1.0))
///     .with_pop_size(50)
///     .with_max_gen(100)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MohoConfig {
    /// Length of each position vector.
    pub dimension: usize,

    /// Box constraints on every position coordinate.
    pub bounds: Bounds,

    /// Number of individuals in the population. Must be even and at
    /// least 4: the first half runs the exploration phase, the second
    /// half the defense phase.
    pub pop_size: usize,

    /// Number of generations to run. The loop always runs to completion;
    /// there is no early termination.
    pub max_gen: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to run the movement phases across a rayon worker pool.
    ///
    /// Each population slot draws from its own seeded random stream, so
    /// parallel and sequential execution produce identical results.
    pub parallel: bool,
}

impl MohoConfig {
    /// Creates a configuration for the given problem geometry with the
    /// default population size (50) and generation count (100).
    pub fn new(dimension: usize, bounds: Bounds) -> Self {
        Self {
            dimension,
            bounds,
            pop_size: 50,
            max_gen: 100,
            seed: None,
            parallel: false,
        }
    }

    /// Sets the population size.
    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_gen(mut self, n: usize) -> Self {
        self.max_gen = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel phase execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates every precondition of the configuration.
    ///
    /// Called by [`MohoRunner::run`](crate::MohoRunner::run) before any
    /// work happens, so malformed configurations fail at initialization
    /// rather than mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.pop_size < 4 || self.pop_size % 2 != 0 {
            return Err(ConfigError::InvalidPopSize(self.pop_size));
        }
        if self.max_gen == 0 {
            return Err(ConfigError::ZeroGenerations);
        }

        match &self.bounds {
            Bounds::Uniform { lower, upper } => {
                if lower >= upper {
                    return Err(ConfigError::InvertedBounds {
                        coord: 0,
                        lower: *lower,
                        upper: *upper,
                    });
                }
            }
            Bounds::PerCoordinate { lower, upper } => {
                if lower.len() != self.dimension {
                    return Err(ConfigError::BoundsLengthMismatch {
                        got: lower.len(),
                        dimension: self.dimension,
                    });
                }
                if upper.len() != self.dimension {
                    return Err(ConfigError::BoundsLengthMismatch {
                        got: upper.len(),
                        dimension: self.dimension,
                    });
                }
                for (coord, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
                    if lo >= hi {
                        return Err(ConfigError::InvertedBounds {
                            coord,
                            lower: lo,
                            upper: hi,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
