//! Program representation for Push.
//!
//! A program is an ordered tree of atoms. The same structure is both the
//! genome manipulated by crossover and mutation and the code the
//! interpreter executes, so it is designed to be:
//! - Persistent: point replacement shares every untouched subtree
//! - Addressable: every point has a stable pre-order index
//! - Printable: the text syntax round-trips through the parser

pub mod atom;
pub mod parse;
pub mod program;
pub mod validation;

pub use atom::{Atom, Symbol};
pub use parse::parse_program;
pub use program::{PointIter, Program, Segment};
pub use validation::{check_size, fits};
