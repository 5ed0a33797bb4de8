//! Genetic operators on Push programs.
//!
//! Operators work on program trees only. They never run code, and every
//! random choice is drawn from the source passed in, so a scripted source
//! pins their behavior exactly.

pub mod crossover;
pub mod mutation;
pub mod select;

pub use crossover::{Crossover, CrossoverConfig, RetryScope, SinglePointCrossover, TwoPointCrossover};
pub use mutation::{MutationConfig, Mutator};
pub use select::{KozaSelector, NodeSelector, UniformSelector};
