//! Command-line runner for Push programs.

mod telemetry;

use anyhow::{bail, Context, Result};
use clap::Parser;
use psh_core::PushConfig;
use psh_ir::{check_size, parse_program, Program};
use psh_runtime::Interpreter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "psh-run")]
#[command(author, version, about = "Run or generate Push programs", long_about = None)]
struct Args {
    /// Interpreter configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Instruction list file, overriding the one in the configuration
    #[arg(short, long)]
    instructions: Option<PathBuf>,

    /// Random seed (default: 0)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Step limit (default: the configured execution limit)
    #[arg(long)]
    steps: Option<usize>,

    /// Generate a random program with this many points
    #[arg(short, long, conflicts_with = "program")]
    random: Option<usize>,

    /// Program text, e.g. "( 2 3 integer.+ )"
    program: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry()?;

    let mut config = match &args.config {
        Some(path) => PushConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => PushConfig::default(),
    };
    if let Some(path) = args.instructions.clone() {
        config.instruction_list = Some(path);
    }

    let mut interpreter = Interpreter::setup(config, args.seed)?;
    let program = build_program(&args, &interpreter)?;

    let limit = args
        .steps
        .unwrap_or(interpreter.config().execution_limit);
    let steps = interpreter.execute(&program, limit)?;
    info!(steps, limit, "program finished");

    println!("program: {}", program);
    print!("{}", interpreter);
    Ok(())
}

fn build_program(args: &Args, interpreter: &Interpreter) -> Result<Program> {
    match (args.random, &args.program) {
        (Some(size), _) => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            let program = interpreter
                .random_code(size.max(1), &mut rng)
                .context("random code needs an instruction list (--instructions)")?;
            Ok(program)
        }
        (None, Some(text)) => {
            let program = parse_program(text)?;
            check_size(&program, interpreter.config().max_points_in_program)?;
            Ok(program)
        }
        (None, None) => bail!("pass a program or --random <size>"),
    }
}
