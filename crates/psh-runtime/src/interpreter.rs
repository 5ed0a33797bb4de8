//! The Push interpreter: stacks, frames and the fetch-execute loop.

use crate::generate::CodeGenerator;
use crate::registry::{self, AtomGenerator, Instruction, InstructionSet};
use crate::stacks::{FrameTops, StackKind, StackSet};
use psh_core::{PushConfig, RandomSource, Result, Stack, StackOps};
use psh_ir::{parse_program, Atom, Program};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::path::Path;
use tracing::{debug, instrument, trace};

const FRAME_PUSH: &str = "frame.push";
const FRAME_POP: &str = "frame.pop";

/// A Push interpreter.
///
/// One interpreter is owned by each evaluation thread. Stacks are not
/// cleared between runs; call [`Interpreter::clear_stacks`] or use
/// [`Interpreter::evaluate_case`].
pub struct Interpreter {
    config: PushConfig,
    instructions: InstructionSet,
    stacks: StackSet,
    saved_frames: Vec<StackSet>,
    exec: Stack<Atom>,
    input: Stack<Atom>,
    custom: Vec<Stack<Atom>>,
    /// Source for instructions that draw at run time, such as `integer.rand`
    rng: ChaCha8Rng,
    total_steps: u64,
    evaluation_executions: u64,
}

impl Interpreter {
    pub fn new(config: PushConfig) -> Self {
        Self::with_seed(config, 0)
    }

    pub fn with_seed(config: PushConfig, seed: u64) -> Self {
        Self {
            config,
            instructions: InstructionSet::with_builtins(),
            stacks: StackSet::new(),
            saved_frames: Vec::new(),
            exec: Stack::new("exec"),
            input: Stack::new("input"),
            custom: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            total_steps: 0,
            evaluation_executions: 0,
        }
    }

    /// Build an interpreter and load the configured instruction list, if any
    pub fn setup(config: PushConfig, seed: u64) -> Result<Self> {
        let list = config.instruction_list.clone();
        let mut interpreter = Self::with_seed(config, seed);
        if let Some(path) = list {
            interpreter.load_instruction_list(path)?;
        }
        Ok(interpreter)
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    pub fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    // Instruction set

    /// Choose the generators eligible for random code
    pub fn set_instructions(&mut self, list: &Program) -> Result<()> {
        self.instructions.configure(list)
    }

    /// Read an instruction list file, one name per line, and apply it
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_instruction_list(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let joined = text.lines().collect::<Vec<_>>().join(" ");
        let list = parse_program(&format!("({})", joined))?;
        debug!(%list, "instruction list");
        self.set_instructions(&list)
    }

    /// Register a problem-specific instruction, eligible for random code
    pub fn add_instruction<I>(&mut self, name: &str, instruction: I)
    where
        I: Instruction + 'static,
    {
        self.instructions.add_instruction(name, instruction);
    }

    // Stacks

    /// The stacks of the current frame
    pub fn stacks(&self) -> &StackSet {
        &self.stacks
    }

    pub fn stacks_mut(&mut self) -> &mut StackSet {
        &mut self.stacks
    }

    pub fn exec_stack(&self) -> &Stack<Atom> {
        &self.exec
    }

    pub fn exec_stack_mut(&mut self) -> &mut Stack<Atom> {
        &mut self.exec
    }

    pub fn input_stack(&self) -> &Stack<Atom> {
        &self.input
    }

    pub fn input_stack_mut(&mut self) -> &mut Stack<Atom> {
        &mut self.input
    }

    /// Add a custom stack and return its index
    pub fn add_custom_stack(&mut self) -> usize {
        self.custom.push(Stack::new("custom"));
        self.custom.len() - 1
    }

    pub fn custom_stack(&self, index: usize) -> Option<&Stack<Atom>> {
        self.custom.get(index)
    }

    pub fn custom_stack_mut(&mut self, index: usize) -> Option<&mut Stack<Atom>> {
        self.custom.get_mut(index)
    }

    /// Type-independent view of one stack
    pub fn stack_ops(&mut self, kind: StackKind) -> &mut dyn StackOps {
        match kind {
            StackKind::Integer => &mut self.stacks.integer,
            StackKind::Float => &mut self.stacks.float,
            StackKind::Boolean => &mut self.stacks.boolean,
            StackKind::Name => &mut self.stacks.name,
            StackKind::Code => &mut self.stacks.code,
            StackKind::Exec => &mut self.exec,
            StackKind::Input => &mut self.input,
        }
    }

    /// Clear every stack, custom stacks included, and drop saved frames
    pub fn clear_stacks(&mut self) {
        if !self.saved_frames.is_empty() {
            self.stacks = self.saved_frames.swap_remove(0);
            self.saved_frames.clear();
        }
        self.stacks.clear();
        self.exec.clear();
        self.input.clear();
        for stack in &mut self.custom {
            stack.clear();
        }
    }

    // Frames

    /// Number of frames entered above the outermost stack set
    pub fn frame_depth(&self) -> usize {
        self.saved_frames.len()
    }

    /// Enter a fresh stack set seeded with the current tops.
    /// No-op unless frame mode is enabled.
    pub fn push_frame(&mut self) {
        if !self.config.push_frame_mode {
            return;
        }
        let tops = FrameTops::capture(&self.stacks);
        let caller = std::mem::take(&mut self.stacks);
        self.saved_frames.push(caller);
        tops.seed(&mut self.stacks);
        trace!(depth = self.saved_frames.len(), "frame pushed");
    }

    /// Return to the caller's stack set, carrying the current tops back.
    /// The outermost frame is never popped.
    pub fn pop_frame(&mut self) {
        if !self.config.push_frame_mode {
            return;
        }
        let Some(caller) = self.saved_frames.pop() else {
            return;
        };
        let tops = FrameTops::capture(&self.stacks);
        self.stacks = caller;
        tops.seed(&mut self.stacks);
        trace!(depth = self.saved_frames.len(), "frame popped");
    }

    // Execution

    /// Load `program` and run it for at most `max_steps` steps.
    ///
    /// Returns the number of steps taken. Stacks are not cleared first.
    pub fn execute(&mut self, program: &Program, max_steps: usize) -> Result<usize> {
        self.evaluation_executions += 1;
        self.load_program(program);
        self.step(max_steps)
    }

    /// Execute with the configured execution limit
    pub fn run(&mut self, program: &Program) -> Result<usize> {
        self.execute(program, self.config.execution_limit)
    }

    /// Push `program` onto both the code and exec stacks
    pub fn load_program(&mut self, program: &Program) {
        self.stacks.code.push(Atom::Program(program.clone()));
        self.exec.push(Atom::Program(program.clone()));
    }

    /// Run the loaded program until the exec stack empties or `max_steps`
    /// atoms have been executed
    pub fn step(&mut self, max_steps: usize) -> Result<usize> {
        let mut executed = 0;
        while executed < max_steps {
            let Ok(atom) = self.exec.pop() else {
                break;
            };
            self.execute_atom(atom)?;
            executed += 1;
        }
        self.total_steps += executed as u64;
        trace!(executed, halted = self.exec.is_empty(), "step");
        Ok(executed)
    }

    fn execute_atom(&mut self, atom: Atom) -> Result<()> {
        match atom {
            Atom::Program(program) => {
                let frames = self.config.push_frame_mode;
                if frames {
                    self.exec.push(Atom::name(FRAME_POP));
                }
                program.push_all_reversed(&mut self.exec);
                if frames {
                    self.exec.push(Atom::name(FRAME_PUSH));
                }
            }
            Atom::Integer(value) => self.stacks.integer.push(value),
            Atom::Float(value) => self.stacks.float.push(value),
            Atom::Boolean(value) => self.stacks.boolean.push(value),
            Atom::Name(name) => match self.instructions.get(name.as_str()) {
                Some(instruction) => instruction.execute(self)?,
                None => self.stacks.name.push(name),
            },
        }
        Ok(())
    }

    /// Clear the stacks, let `seed` push inputs, then run `program` with the
    /// execution limit. Returns the steps taken.
    pub fn evaluate_case<F>(&mut self, program: &Program, seed: F) -> Result<usize>
    where
        F: FnOnce(&mut Interpreter),
    {
        self.clear_stacks();
        seed(self);
        self.run(program)
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn evaluation_executions(&self) -> u64 {
        self.evaluation_executions
    }

    // Random code

    fn generator(&self) -> CodeGenerator<'_> {
        CodeGenerator::new(self.instructions.eligible(), &self.config)
    }

    /// One atom from the eligible generators
    pub fn random_atom(&self, rng: &mut dyn RandomSource) -> Result<Atom> {
        self.generator().random_atom(rng)
    }

    /// A random program with `size` points, root included
    pub fn random_code(&self, size: usize, rng: &mut dyn RandomSource) -> Result<Program> {
        self.generator().random_code(size, rng)
    }

    pub fn decompose(&self, count: usize, max_elements: usize, rng: &mut dyn RandomSource) -> Vec<usize> {
        self.generator().decompose(count, max_elements, rng)
    }

    pub fn eligible_generators(&self) -> &[AtomGenerator] {
        self.instructions.eligible()
    }

    pub(crate) fn rand_below(&mut self, bound: usize) -> usize {
        self.rng.below(bound)
    }

    pub(crate) fn rand_integer(&mut self) -> i32 {
        registry::random_integer(&self.config, &mut self.rng)
    }

    pub(crate) fn rand_float(&mut self) -> f32 {
        registry::random_float(&self.config, &mut self.rng)
    }

    pub(crate) fn rand_boolean(&mut self) -> bool {
        self.rng.coin()
    }

    pub(crate) fn rand_code(&mut self, size: usize) -> Result<Program> {
        let Self {
            instructions,
            config,
            rng,
            ..
        } = self;
        CodeGenerator::new(instructions.eligible(), config).random_code(size, rng)
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exec stack: {}", self.exec)?;
        writeln!(f, "code stack: {}", self.stacks.code)?;
        writeln!(f, "int stack: {}", self.stacks.integer)?;
        writeln!(f, "float stack: {}", self.stacks.float)?;
        writeln!(f, "boolean stack: {}", self.stacks.boolean)?;
        writeln!(f, "name stack: {}", self.stacks.name)?;
        writeln!(f, "input stack: {}", self.input)
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("config", &self.config)
            .field("instructions", &self.instructions)
            .field("frames", &self.saved_frames.len())
            .field("total_steps", &self.total_steps)
            .finish()
    }
}
