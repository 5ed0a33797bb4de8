//! Node selection for mutation.
//!
//! Selectors return a cut-point in `[0, program.size())`; the addressed
//! point is `cut + 1`.

use psh_core::RandomSource;
use psh_ir::Program;
use serde::{Deserialize, Serialize};

pub trait NodeSelector: Send + Sync {
    /// Pick a cut-point. Programs without points always yield 0.
    fn select(&self, program: &Program, rng: &mut dyn RandomSource) -> usize;
}

/// Every point is equally likely
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSelector;

impl NodeSelector for UniformSelector {
    fn select(&self, program: &Program, rng: &mut dyn RandomSource) -> usize {
        match program.size() {
            0 => 0,
            size => rng.below(size),
        }
    }
}

/// Koza-style selection biased towards nested programs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct KozaSelector {
    /// Chance of picking a nested program rather than a leaf
    pub internal_probability: f32,
}

impl Default for KozaSelector {
    fn default() -> Self {
        Self {
            internal_probability: 0.9,
        }
    }
}

impl NodeSelector for KozaSelector {
    fn select(&self, program: &Program, rng: &mut dyn RandomSource) -> usize {
        let (internal, leaves): (Vec<usize>, Vec<usize>) = {
            let mut internal = Vec::new();
            let mut leaves = Vec::new();
            for (point, atom) in program.iter_points() {
                if atom.is_program() {
                    internal.push(point - 1);
                } else {
                    leaves.push(point - 1);
                }
            }
            (internal, leaves)
        };

        let want_internal = rng.unit_f32() < self.internal_probability;
        let pool = match (want_internal, internal.is_empty(), leaves.is_empty()) {
            (_, true, true) => return 0,
            (true, false, _) | (false, false, true) => &internal,
            _ => &leaves,
        };
        pool[rng.below(pool.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psh_core::SequenceSource;
    use psh_ir::parse_program;

    #[test]
    fn test_uniform() {
        let program = parse_program("( 1 ( 2 3 ) 4 )").unwrap();
        let mut rng = SequenceSource::new(vec![3, 9]);
        assert_eq!(UniformSelector.select(&program, &mut rng), 3);
        assert_eq!(UniformSelector.select(&program, &mut rng), 4);
        assert_eq!(UniformSelector.select(&parse_program("( )").unwrap(), &mut rng), 0);
    }

    #[test]
    fn test_koza_prefers_internal_points() {
        let program = parse_program("( 1 ( 2 ( 3 ) ) 4 )").unwrap();
        let selector = KozaSelector::default();

        // internal points are cut-points 1 and 3
        let mut rng = SequenceSource::new(vec![1]).with_floats(vec![0.5]);
        assert_eq!(selector.select(&program, &mut rng), 3);

        // leaves are cut-points 0, 2, 4 and 5
        let mut rng = SequenceSource::new(vec![2]).with_floats(vec![0.95]);
        assert_eq!(selector.select(&program, &mut rng), 4);
    }

    #[test]
    fn test_koza_falls_back_to_available_class() {
        let flat = parse_program("( 1 2 3 )").unwrap();
        let selector = KozaSelector::default();
        let mut rng = SequenceSource::new(vec![2]).with_floats(vec![0.0]);
        assert_eq!(selector.select(&flat, &mut rng), 2);

        let only_programs = parse_program("( ( ) ( ) )").unwrap();
        let mut rng = SequenceSource::new(vec![1]).with_floats(vec![0.99]);
        assert_eq!(selector.select(&only_programs, &mut rng), 1);
    }
}
