//! Configuration types for the Push interpreter.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Interpreter parameters: limits, ERC ranges and code generation mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Maximum number of steps a single evaluation may take
    pub execution_limit: usize,
    /// Maximum number of points below the root of any program
    pub max_points_in_program: usize,
    /// Upper bound for randomly generated code, in points
    pub max_random_code_size: usize,
    /// Give every executed subtree a fresh set of stacks
    pub push_frame_mode: bool,
    /// Lower bound of the integer ERC range
    pub min_random_integer: i32,
    /// Upper bound (exclusive) of the integer ERC range
    pub max_random_integer: i32,
    /// Integer ERCs are multiples of this step above the lower bound
    pub random_integer_res: i32,
    /// Lower bound of the float ERC range
    pub min_random_float: f32,
    /// Upper bound of the float ERC range
    pub max_random_float: f32,
    /// Float ERCs are multiples of this step above the lower bound
    pub random_float_res: f32,
    /// Generate programs without nested sub-programs
    pub generate_flat: bool,
    /// Instruction list file, one instruction name per line
    pub instruction_list: Option<PathBuf>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            execution_limit: 100,
            max_points_in_program: 100,
            max_random_code_size: 30,
            push_frame_mode: false,
            min_random_integer: -10,
            max_random_integer: 10,
            random_integer_res: 1,
            min_random_float: -10.0,
            max_random_float: 10.0,
            random_float_res: 0.01,
            generate_flat: false,
            instruction_list: None,
        }
    }
}

impl PushConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
