//! Random sources used for code generation, cut-point and node selection.
//!
//! Every randomized operation takes its source as an explicit argument so a
//! run can be replayed exactly from a seed, or pinned to a scripted sequence
//! of draws.

use rand::{Rng, RngCore};

/// The draws the Push operators need
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be positive.
    fn below(&mut self, bound: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn unit_f32(&mut self) -> f32;

    /// Fair coin
    fn coin(&mut self) -> bool {
        self.below(2) == 1
    }
}

impl<R: RngCore> RandomSource for R {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn unit_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Replays a fixed script of draws.
///
/// `below` returns the next scripted integer clamped into `[0, bound)`;
/// `unit_f32` returns the next scripted float. Once a script runs out its
/// last value repeats, and an empty script yields zeros.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    draws: Vec<usize>,
    floats: Vec<f32>,
    next_draw: usize,
    next_float: usize,
}

impl SequenceSource {
    pub fn new(draws: impl Into<Vec<usize>>) -> Self {
        Self {
            draws: draws.into(),
            ..Default::default()
        }
    }

    pub fn with_floats(mut self, floats: impl Into<Vec<f32>>) -> Self {
        self.floats = floats.into();
        self
    }

    /// Number of integer draws taken so far
    pub fn consumed(&self) -> usize {
        self.next_draw
    }

    /// Number of float draws taken so far
    pub fn floats_consumed(&self) -> usize {
        self.next_float
    }
}

impl RandomSource for SequenceSource {
    fn below(&mut self, bound: usize) -> usize {
        let value = self
            .draws
            .get(self.next_draw)
            .or_else(|| self.draws.last())
            .copied()
            .unwrap_or(0);
        self.next_draw += 1;
        value.min(bound.saturating_sub(1))
    }

    fn unit_f32(&mut self) -> f32 {
        let value = self
            .floats
            .get(self.next_float)
            .or_else(|| self.floats.last())
            .copied()
            .unwrap_or(0.0);
        self.next_float += 1;
        value
    }
}
