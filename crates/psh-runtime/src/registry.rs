//! Instruction registry and random atom generators.

use crate::instructions;
use crate::interpreter::Interpreter;
use psh_core::{Error, PushConfig, RandomSource, Result};
use psh_ir::{Atom, Program, Symbol};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Stack types accepted by `registered.<type>` in an instruction list
const REGISTERED_TYPES: [&str; 8] = [
    "integer", "float", "boolean", "exec", "code", "name", "input", "frame",
];

const MAKE_INPUTS: &str = "input.makeinputs";

/// An operation on the interpreter state.
///
/// Instructions resolve the stacks they touch through the interpreter on
/// every call, so they stay valid across frame switches.
pub trait Instruction: Send + Sync {
    fn execute(&self, interpreter: &mut Interpreter) -> Result<()>;
}

impl<F> Instruction for F
where
    F: Fn(&mut Interpreter) -> Result<()> + Send + Sync,
{
    fn execute(&self, interpreter: &mut Interpreter) -> Result<()> {
        self(interpreter)
    }
}

/// Produces one atom for random code
#[derive(Debug, Clone, PartialEq)]
pub enum AtomGenerator {
    /// The instruction's own name
    Instruction(Symbol),
    /// Integer ephemeral random constant
    IntegerErc,
    /// Float ephemeral random constant
    FloatErc,
    /// A fixed literal such as `true`
    Constant(Atom),
}

impl AtomGenerator {
    pub fn generate(&self, config: &PushConfig, rng: &mut dyn RandomSource) -> Atom {
        match self {
            AtomGenerator::Instruction(name) => Atom::Name(name.clone()),
            AtomGenerator::IntegerErc => Atom::Integer(random_integer(config, rng)),
            AtomGenerator::FloatErc => Atom::Float(random_float(config, rng)),
            AtomGenerator::Constant(atom) => atom.clone(),
        }
    }

    /// Name this generator is listed under
    pub fn label(&self) -> String {
        match self {
            AtomGenerator::Instruction(name) => name.to_string(),
            AtomGenerator::IntegerErc => "integer.erc".to_string(),
            AtomGenerator::FloatErc => "float.erc".to_string(),
            AtomGenerator::Constant(atom) => atom.to_string(),
        }
    }
}

/// Integer ERC: a multiple of the resolution above the lower bound
pub fn random_integer(config: &PushConfig, rng: &mut dyn RandomSource) -> i32 {
    let span = config
        .max_random_integer
        .saturating_sub(config.min_random_integer)
        .max(1) as usize;
    let mut r = rng.below(span) as i32;
    if config.random_integer_res > 0 {
        r -= r % config.random_integer_res;
    }
    r.wrapping_add(config.min_random_integer)
}

/// Float ERC: a multiple of the resolution above the lower bound
pub fn random_float(config: &PushConfig, rng: &mut dyn RandomSource) -> f32 {
    let mut r = rng.unit_f32() * (config.max_random_float - config.min_random_float);
    if config.random_float_res > 0.0 {
        r -= r % config.random_float_res;
    }
    r + config.min_random_float
}

/// Name to instruction table plus the generators eligible for random code.
///
/// Both maps are ordered by name, so expanding `registered.<type>` is
/// deterministic and random code is reproducible from a seed.
#[derive(Clone, Default)]
pub struct InstructionSet {
    instructions: BTreeMap<Symbol, Arc<dyn Instruction>>,
    generators: BTreeMap<Symbol, AtomGenerator>,
    eligible: Vec<AtomGenerator>,
}

impl InstructionSet {
    /// An empty registry holding only the literal generators
    pub fn new() -> Self {
        let mut set = Self::default();
        set.generators
            .insert(Symbol::new("integer.erc"), AtomGenerator::IntegerErc);
        set.generators
            .insert(Symbol::new("float.erc"), AtomGenerator::FloatErc);
        set.generators.insert(
            Symbol::new("true"),
            AtomGenerator::Constant(Atom::Boolean(true)),
        );
        set.generators.insert(
            Symbol::new("false"),
            AtomGenerator::Constant(Atom::Boolean(false)),
        );
        set
    }

    /// A registry with every built-in instruction defined
    pub fn with_builtins() -> Self {
        let mut set = Self::new();
        instructions::register_builtins(&mut set);
        set
    }

    /// Define an instruction and its generator. Not eligible for random code
    /// until selected by an instruction list.
    pub fn define<I>(&mut self, name: &str, instruction: I)
    where
        I: Instruction + 'static,
    {
        let symbol = Symbol::new(name);
        self.instructions
            .insert(symbol.clone(), Arc::new(instruction));
        self.generators
            .insert(symbol.clone(), AtomGenerator::Instruction(symbol));
    }

    /// Define an instruction and make it eligible immediately
    pub fn add_instruction<I>(&mut self, name: &str, instruction: I)
    where
        I: Instruction + 'static,
    {
        self.define(name, instruction);
        self.eligible
            .push(AtomGenerator::Instruction(Symbol::new(name)));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Instruction>> {
        self.instructions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instructions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Registered instruction names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &Symbol> {
        self.instructions.keys()
    }

    pub fn generator(&self, name: &str) -> Option<&AtomGenerator> {
        self.generators.get(name)
    }

    /// Generators random code currently draws from
    pub fn eligible(&self) -> &[AtomGenerator] {
        &self.eligible
    }

    /// Sorted, de-duplicated names of the eligible generators
    pub fn eligible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.eligible.iter().map(AtomGenerator::label).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Replace the eligible generators with those named by `list`.
    ///
    /// Besides plain instruction names, `registered.<type>` selects every
    /// instruction prefixed by `<type>.` (plus the type's literal generators)
    /// and `input.makeinputsN` defines and selects `input.in0` to
    /// `input.in{N-1}`.
    pub fn configure(&mut self, list: &Program) -> Result<()> {
        let mut eligible = Vec::new();

        for atom in list.atoms() {
            let name = match atom {
                Atom::Name(name) => name.as_str().to_string(),
                Atom::Boolean(value) => value.to_string(),
                other => {
                    return Err(Error::Config(format!(
                        "instruction list must contain instruction names only, found {}",
                        other
                    )))
                }
            };

            if let Some(kind) = name.strip_prefix("registered.") {
                self.select_registered(kind, &mut eligible);
            } else if let Some(count) = name.strip_prefix(MAKE_INPUTS) {
                let count: usize = count.parse().map_err(|_| {
                    Error::Config(format!("bad input count in \"{}\"", name))
                })?;
                self.make_inputs(count, &mut eligible);
            } else {
                let generator = self.generators.get(name.as_str()).cloned().ok_or_else(|| {
                    Error::Config(format!("unknown instruction \"{}\" in instruction set", name))
                })?;
                eligible.push(generator);
            }
        }

        self.eligible = eligible;
        debug!(
            generators = self.eligible.len(),
            "configured instruction set"
        );
        Ok(())
    }

    fn select_registered(&self, kind: &str, eligible: &mut Vec<AtomGenerator>) {
        if !REGISTERED_TYPES.contains(&kind) {
            warn!(kind, "unknown registered instruction type, skipping");
            return;
        }

        let prefix = format!("{}.", kind);
        eligible.extend(
            self.instructions
                .keys()
                .filter(|name| name.as_str().starts_with(&prefix))
                .map(|name| AtomGenerator::Instruction(name.clone())),
        );

        match kind {
            "boolean" => {
                eligible.push(AtomGenerator::Constant(Atom::Boolean(true)));
                eligible.push(AtomGenerator::Constant(Atom::Boolean(false)));
            }
            "integer" => eligible.push(AtomGenerator::IntegerErc),
            "float" => eligible.push(AtomGenerator::FloatErc),
            _ => {}
        }
    }

    // Input instructions are defined even if a later entry fails the list
    fn make_inputs(&mut self, count: usize, eligible: &mut Vec<AtomGenerator>) {
        for index in 0..count {
            let name = format!("input.in{}", index);
            self.define(&name, instructions::input_in(index));
            eligible.push(AtomGenerator::Instruction(Symbol::new(&name)));
        }
    }
}

impl fmt::Debug for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionSet")
            .field("instructions", &self.instructions.len())
            .field("eligible", &self.eligible_names())
            .finish()
    }
}
