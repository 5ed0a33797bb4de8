//! Push interpreter.
//!
//! This crate provides the execution environment for Push programs, including:
//! - Typed stacks with optional per-subtree frames
//! - The instruction registry and random atom generators
//! - The built-in instruction set
//! - Random code generation
//! - The evaluation contract used by fitness problems

pub mod generate;
pub mod instructions;
pub mod interpreter;
pub mod problem;
pub mod registry;
pub mod stacks;

pub use generate::CodeGenerator;
pub use interpreter::Interpreter;
pub use problem::{FloatRegression, Problem, TestCase};
pub use registry::{AtomGenerator, Instruction, InstructionSet};
pub use stacks::{FrameTops, StackKind, StackSet};
