//! Flat-buffer population storage.
//!
//! Positions live in one contiguous `Vec<f64>` with `dimension` stride;
//! objective rows, ranks, and crowding distances sit in parallel arrays
//! indexed by slot. Buffers are allocated once per generation and
//! overwritten in place, so ownership stays with the generation loop:
//! one parent, one offspring, one transient merged pool.

use std::ops::Range;

use rand::Rng;
use rayon::prelude::*;

use crate::multi_objective::rank_population;
use crate::types::Bounds;

/// A fixed-size collection of candidate solutions with per-slot Pareto
/// rank and crowding-distance annotations.
#[derive(Debug, Clone)]
pub(crate) struct Population {
    dimension: usize,
    /// Row-major positions, `len() * dimension` values.
    positions: Vec<f64>,
    /// One objective row per slot.
    scores: Vec<Vec<f64>>,
    /// Pareto rank per slot (1 = non-dominated front, 0 = not yet ranked).
    ranks: Vec<usize>,
    /// Crowding distance per slot, within its front.
    crowding: Vec<f64>,
}

impl Population {
    /// Samples `pop_size` uniform random positions within bounds.
    /// Scores are left empty; the caller evaluates next.
    pub fn sample_uniform<R: Rng>(
        pop_size: usize,
        dimension: usize,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Self {
        let mut positions = Vec::with_capacity(pop_size * dimension);
        for _ in 0..pop_size {
            positions.extend(bounds.sample(dimension, rng));
        }
        Self {
            dimension,
            positions,
            scores: vec![Vec::new(); pop_size],
            ranks: vec![0; pop_size],
            crowding: vec![0.0; pop_size],
        }
    }

    /// Builds a population directly from buffers. Ranks and crowding
    /// start unassigned.
    #[cfg(test)]
    pub fn from_parts(dimension: usize, positions: Vec<f64>, scores: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(positions.len(), scores.len() * dimension);
        let n = scores.len();
        Self {
            dimension,
            positions,
            scores,
            ranks: vec![0; n],
            crowding: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn position(&self, slot: usize) -> &[f64] {
        &self.positions[slot * self.dimension..(slot + 1) * self.dimension]
    }

    pub fn score(&self, slot: usize) -> &[f64] {
        &self.scores[slot]
    }

    pub fn scores(&self) -> &[Vec<f64>] {
        &self.scores
    }

    pub fn set_score(&mut self, slot: usize, score: Vec<f64>) {
        self.scores[slot] = score;
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn crowding(&self) -> &[f64] {
        &self.crowding
    }

    /// Indices of the current rank-1 front. Requires [`update_ranks`]
    /// to have run on the current scores.
    pub fn first_front_indices(&self) -> Vec<usize> {
        self.ranks
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Recomputes ranks and per-front crowding distances from the
    /// current scores.
    pub fn update_ranks(&mut self) {
        let ranking = rank_population(&self.scores);
        self.ranks = ranking.ranks;
        self.crowding = ranking.crowding;
    }

    /// Concatenates two populations into a transient pool.
    /// Ranks are left unassigned; the selection pass ranks the pool.
    pub fn merge(&self, other: &Population) -> Population {
        debug_assert_eq!(self.dimension, other.dimension);
        let n = self.len() + other.len();
        let mut positions = Vec::with_capacity(n * self.dimension);
        positions.extend_from_slice(&self.positions);
        positions.extend_from_slice(&other.positions);
        let mut scores = Vec::with_capacity(n);
        scores.extend_from_slice(&self.scores);
        scores.extend_from_slice(&other.scores);
        Population {
            dimension: self.dimension,
            positions,
            scores,
            ranks: vec![0; n],
            crowding: vec![0.0; n],
        }
    }

    /// Copies the given slots out into a new population.
    pub fn gather(&self, slots: &[usize]) -> Population {
        let mut positions = Vec::with_capacity(slots.len() * self.dimension);
        let mut scores = Vec::with_capacity(slots.len());
        for &slot in slots {
            positions.extend_from_slice(self.position(slot));
            scores.push(self.scores[slot].clone());
        }
        Population {
            dimension: self.dimension,
            positions,
            scores,
            ranks: vec![0; slots.len()],
            crowding: vec![0.0; slots.len()],
        }
    }

    /// Mutable view over a range of slots: `(slot, position, score)`.
    ///
    /// Positions and scores are disjoint buffers, so each slot hands out
    /// exclusive access to exactly its own data.
    pub fn slots_mut<'a>(
        &'a mut self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (usize, &'a mut [f64], &'a mut Vec<f64>)> + 'a {
        let dim = self.dimension;
        let start = range.start;
        let positions = &mut self.positions[range.start * dim..range.end * dim];
        let scores = &mut self.scores[range];
        positions
            .chunks_mut(dim)
            .zip(scores.iter_mut())
            .enumerate()
            .map(move |(k, (pos, score))| (start + k, pos, score))
    }

    /// Parallel equivalent of [`slots_mut`](Population::slots_mut).
    pub fn par_slots_mut<'a>(
        &'a mut self,
        range: Range<usize>,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [f64], &'a mut Vec<f64>)> + 'a {
        let dim = self.dimension;
        let start = range.start;
        let positions = &mut self.positions[range.start * dim..range.end * dim];
        let scores = &mut self.scores[range];
        positions
            .par_chunks_mut(dim)
            .zip(scores.par_iter_mut())
            .enumerate()
            .map(move |(k, (pos, score))| (start + k, pos, score))
    }
}
