//! Size limits for programs.

use crate::program::Program;
use psh_core::{Error, Result};
use tracing::trace;

/// Whether `program` fits within `max_points`
pub fn fits(program: &Program, max_points: usize) -> bool {
    program.size() <= max_points
}

/// Reject programs larger than `max_points`
pub fn check_size(program: &Program, max_points: usize) -> Result<()> {
    let size = program.size();
    if size > max_points {
        trace!(size, max_points, "program over point limit");
        return Err(Error::Validation(format!(
            "program has {} points, limit is {}",
            size, max_points
        )));
    }
    Ok(())
}
