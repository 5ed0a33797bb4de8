//! Fitness records reported by problem evaluations.

use serde::{Deserialize, Serialize};

/// Scalar fitness of one program: lower standardized fitness is better
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Mean error over all test cases
    pub standardized: f32,
    /// Number of test cases solved within the hit threshold
    pub hits: u32,
}

impl Fitness {
    pub fn new(standardized: f32, hits: u32) -> Self {
        Self { standardized, hits }
    }

    /// Aggregate per-case errors into a mean absolute error.
    ///
    /// Errors below `hit_threshold` count as hits. A total that overflows to
    /// infinity is clamped to `f32::MAX` so it still orders correctly.
    pub fn from_errors<I>(errors: I, hit_threshold: f32) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let mut total = 0.0f32;
        let mut hits = 0;
        let mut cases = 0usize;

        for error in errors {
            if error < hit_threshold {
                hits += 1;
            }
            total += error;
            cases += 1;
        }

        let standardized = if total.is_infinite() {
            f32::MAX
        } else if cases == 0 {
            0.0
        } else {
            total / cases as f32
        };

        Self { standardized, hits }
    }

    /// True when every case was a hit and the error vanished
    pub fn is_ideal(&self) -> bool {
        self.standardized == 0.0
    }

    pub fn is_better_than(&self, other: &Fitness) -> bool {
        self.standardized < other.standardized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_absolute_error() {
        let fitness = Fitness::from_errors([0.0, 2.0, 4.0, 0.005], 0.01);
        assert!((fitness.standardized - 1.50125).abs() < 1e-6);
        assert_eq!(fitness.hits, 2);
    }

    #[test]
    fn test_infinite_total_clamps() {
        let fitness = Fitness::from_errors([f32::MAX, f32::MAX, 1.0], 0.01);
        assert_eq!(fitness.standardized, f32::MAX);
        assert_eq!(fitness.hits, 0);
    }

    #[test]
    fn test_ordering() {
        let good = Fitness::new(0.5, 3);
        let bad = Fitness::new(2.0, 1);
        assert!(good.is_better_than(&bad));
        assert!(!bad.is_better_than(&good));
        assert!(Fitness::from_errors([0.0, 0.0], 0.01).is_ideal());
    }
}
