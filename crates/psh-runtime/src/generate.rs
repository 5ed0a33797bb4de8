//! Random code generation.

use crate::registry::AtomGenerator;
use psh_core::{Error, PushConfig, RandomSource, Result};
use psh_ir::{Atom, Program};

/// Builds random atoms and programs from a set of eligible generators
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator<'a> {
    generators: &'a [AtomGenerator],
    config: &'a PushConfig,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(generators: &'a [AtomGenerator], config: &'a PushConfig) -> Self {
        Self { generators, config }
    }

    /// One atom from a uniformly chosen generator
    pub fn random_atom(&self, rng: &mut dyn RandomSource) -> Result<Atom> {
        if self.generators.is_empty() {
            return Err(Error::Config(
                "no instructions are eligible for random code".to_string(),
            ));
        }
        let index = rng.below(self.generators.len());
        Ok(self.generators[index].generate(self.config, rng))
    }

    /// A program with exactly `size` points, root included.
    ///
    /// In flat mode, a sub-size larger than one becomes that many atoms at
    /// the current level instead of a nested program.
    pub fn random_code(&self, size: usize, rng: &mut dyn RandomSource) -> Result<Program> {
        let budget = size.saturating_sub(1);
        let distribution = self.decompose(budget, budget, rng);

        let mut atoms = Vec::with_capacity(distribution.len());
        for count in distribution {
            if count == 1 {
                atoms.push(self.random_atom(rng)?);
            } else if self.config.generate_flat {
                for _ in 0..count {
                    atoms.push(self.random_atom(rng)?);
                }
            } else {
                atoms.push(Atom::Program(self.random_code(count, rng)?));
            }
        }

        Ok(Program::from_atoms(atoms))
    }

    /// Split `count` points into a shuffled list of at most `max_elements`
    /// sub-sizes summing to it
    pub fn decompose(&self, count: usize, max_elements: usize, rng: &mut dyn RandomSource) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut remaining = count;
        let mut elements = max_elements;
        while remaining >= 1 {
            let this_size = if remaining < 2 {
                1
            } else if elements <= 1 {
                remaining
            } else {
                rng.below(remaining) + 1
            };
            sizes.push(this_size);
            remaining -= this_size;
            elements = elements.saturating_sub(1);
        }

        for i in 0..sizes.len() {
            let j = rng.below(sizes.len());
            sizes.swap(i, j);
        }

        sizes
    }
}
