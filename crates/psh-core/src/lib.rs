//! Core types and utilities shared by the Push interpreter and the genetic operators.

pub mod config;
pub mod error;
pub mod fitness;
pub mod random;
pub mod stack;

pub use config::*;
pub use error::{Error, Result};
pub use fitness::*;
pub use random::{RandomSource, SequenceSource};
pub use stack::{Stack, StackOps};
