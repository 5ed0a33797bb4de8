//! Subtree mutation.

use crate::select::{NodeSelector, UniformSelector};
use psh_core::{RandomSource, Result};
use psh_ir::{fits, Atom, Program};
use psh_runtime::Interpreter;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Size replacements relative to the subtree they replace
    pub use_fair: bool,
    /// Fraction of the old subtree size a fair replacement may deviate by
    pub fair_mutation_range: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            use_fair: true,
            fair_mutation_range: 0.3,
        }
    }
}

/// Replaces one subtree with freshly generated code
pub struct Mutator {
    config: MutationConfig,
    selector: Box<dyn NodeSelector>,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Self {
        Self::with_selector(config, UniformSelector)
    }

    pub fn with_selector(config: MutationConfig, selector: impl NodeSelector + 'static) -> Self {
        Self {
            config,
            selector: Box::new(selector),
        }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// A mutated copy of `parent`.
    ///
    /// Code comes from the interpreter's eligible generators. The parent is
    /// returned unchanged when it has no points or the child outgrows the
    /// interpreter's point limit.
    pub fn mutate(
        &self,
        parent: &Program,
        interpreter: &Interpreter,
        rng: &mut dyn RandomSource,
    ) -> Result<Program> {
        if parent.size() == 0 {
            return Ok(parent.clone());
        }

        let point = self.selector.select(parent, rng) + 1;
        let new_size = if self.config.use_fair {
            let old_size = parent.subtree_points(point).unwrap_or(1);
            fair_size(old_size, self.config.fair_mutation_range, rng)
        } else {
            1 + rng.below(interpreter.config().max_random_code_size.max(1))
        };

        let replacement = if new_size == 1 {
            interpreter.random_atom(rng)?
        } else {
            Atom::Program(interpreter.random_code(new_size, rng)?)
        };
        trace!(point, new_size, %replacement, "mutating");

        let child = parent
            .replace_point(point, replacement)
            .unwrap_or_else(|| parent.clone());
        let max_points = interpreter.config().max_points_in_program;
        if !fits(&child, max_points) {
            trace!(size = child.size(), max = max_points, "mutant too large, keeping parent");
            return Ok(parent.clone());
        }
        Ok(child)
    }
}

/// Replacement size within `range * old` of the old size, never below one
fn fair_size(old_size: usize, range: f32, rng: &mut dyn RandomSource) -> usize {
    let range = ((range * old_size as f32) as usize).max(1);
    let offset = rng.below(2 * range) as isize - range as isize;
    (old_size as isize + offset).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::KozaSelector;
    use proptest::prelude::*;
    use psh_core::{PushConfig, SequenceSource};
    use psh_ir::parse_program;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn interpreter(list: &str) -> Interpreter {
        let config = PushConfig {
            min_random_integer: 0,
            max_random_integer: 200,
            random_integer_res: 1,
            ..Default::default()
        };
        let mut interpreter = Interpreter::new(config);
        interpreter
            .set_instructions(&parse_program(list).unwrap())
            .unwrap();
        interpreter
    }

    fn unfair() -> Mutator {
        Mutator::new(MutationConfig {
            use_fair: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_replace_leaf_with_constant() {
        let interpreter = interpreter("( integer.erc )");
        let parent = parse_program("( 1 2 3 integer.dup integer.+ integer.* )").unwrap();
        // cut 3, size 1, generator 0, constant 123
        let mut rng = SequenceSource::new(vec![3, 0, 0, 123]);
        let child = unfair().mutate(&parent, &interpreter, &mut rng).unwrap();
        assert_eq!(child, parse_program("( 1 2 3 123 integer.+ integer.* )").unwrap());
    }

    #[test]
    fn test_replace_with_subprogram() {
        let interpreter = interpreter("( integer.+ )");
        let parent = parse_program("( 1 2 )").unwrap();
        // cut 1, size 1 + 2 = 3; the two remaining points are split as 1 + 1
        let mut rng = SequenceSource::new(vec![1, 2, 0]);
        let child = unfair().mutate(&parent, &interpreter, &mut rng).unwrap();
        assert_eq!(child, parse_program("( 1 ( integer.+ integer.+ ) )").unwrap());
    }

    #[test]
    fn test_empty_parent_is_unchanged() {
        let interpreter = interpreter("( integer.erc )");
        let parent = Program::new();
        let mut rng = SequenceSource::default();
        assert_eq!(unfair().mutate(&parent, &interpreter, &mut rng).unwrap(), parent);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_oversized_mutant_keeps_parent() {
        let config = PushConfig {
            max_points_in_program: 3,
            ..Default::default()
        };
        let mut interpreter = Interpreter::new(config);
        interpreter
            .set_instructions(&parse_program("( integer.+ )").unwrap())
            .unwrap();
        let parent = parse_program("( 1 2 3 )").unwrap();
        let mut rng = SequenceSource::new(vec![0, 5, 0]);
        let child = unfair().mutate(&parent, &interpreter, &mut rng).unwrap();
        assert_eq!(child, parent);
    }

    #[test]
    fn test_no_generators_is_error() {
        let interpreter = interpreter("( )");
        let parent = parse_program("( 1 2 3 )").unwrap();
        let mut rng = SequenceSource::new(vec![0]);
        assert!(unfair().mutate(&parent, &interpreter, &mut rng).is_err());
    }

    #[test]
    fn test_fair_size() {
        // range max(1, 0.3 * 10) = 3, offsets span -3..=2
        assert_eq!(fair_size(10, 0.3, &mut SequenceSource::new(vec![0])), 7);
        assert_eq!(fair_size(10, 0.3, &mut SequenceSource::new(vec![5])), 12);
        // small subtrees still move by one
        assert_eq!(fair_size(1, 0.3, &mut SequenceSource::new(vec![0])), 1);
        assert_eq!(fair_size(1, 0.3, &mut SequenceSource::new(vec![1])), 1);
        assert_eq!(fair_size(2, 0.3, &mut SequenceSource::new(vec![1])), 2);
        assert_eq!(fair_size(2, 0.3, &mut SequenceSource::new(vec![0])), 1);
    }

    #[test]
    fn test_config_from_json() {
        let config: MutationConfig = serde_json::from_str(r#"{ "use_fair": false }"#).unwrap();
        assert!(!config.use_fair);
        assert_eq!(config.fair_mutation_range, 0.3);
    }

    proptest! {
        #[test]
        fn mutants_respect_ceiling(seed in any::<u64>(), fair in any::<bool>(), koza in any::<bool>()) {
            let interpreter = interpreter("( integer.erc integer.+ exec.dup )");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let parent = interpreter.random_code(20, &mut rng).unwrap();
            let config = MutationConfig { use_fair: fair, ..Default::default() };
            let mutator = if koza {
                Mutator::with_selector(config, KozaSelector::default())
            } else {
                Mutator::new(config)
            };

            let max_points = interpreter.config().max_points_in_program;
            let mut current = parent;
            for _ in 0..10 {
                current = mutator.mutate(&current, &interpreter, &mut rng).unwrap();
                prop_assert!(fits(&current, max_points));
            }
        }
    }
}
