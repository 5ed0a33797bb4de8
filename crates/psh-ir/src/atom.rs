//! Atoms: the leaves and nested sub-programs of a Push program.

use crate::program::Program;
use std::fmt;
use std::sync::Arc;

/// Instruction or identifier name.
///
/// Cloning shares the underlying string, so a name copied through many
/// generations of programs is stored once.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// One element of a program
#[derive(Debug, Clone)]
pub enum Atom {
    Integer(i32),
    Float(f32),
    Boolean(bool),
    /// Instruction name, or a quoted identifier when no instruction has it
    Name(Symbol),
    Program(Program),
}

impl Atom {
    pub fn name(name: &str) -> Self {
        Atom::Name(Symbol::new(name))
    }

    /// Points this atom occupies: 1 for a leaf, the full pre-order count
    /// (root included) for a nested program
    pub fn points(&self) -> usize {
        match self {
            Atom::Program(program) => program.points(),
            _ => 1,
        }
    }

    pub fn is_program(&self) -> bool {
        matches!(self, Atom::Program(_))
    }

    pub fn as_program(&self) -> Option<&Program> {
        match self {
            Atom::Program(program) => Some(program),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&Symbol> {
        match self {
            Atom::Name(name) => Some(name),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so a program holding NaN still equals its copy
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Atom::Integer(a), Atom::Integer(b)) => a == b,
            (Atom::Float(a), Atom::Float(b)) => a.to_bits() == b.to_bits(),
            (Atom::Boolean(a), Atom::Boolean(b)) => a == b,
            (Atom::Name(a), Atom::Name(b)) => a == b,
            (Atom::Program(a), Atom::Program(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i32> for Atom {
    fn from(value: i32) -> Self {
        Atom::Integer(value)
    }
}

impl From<f32> for Atom {
    fn from(value: f32) -> Self {
        Atom::Float(value)
    }
}

impl From<bool> for Atom {
    fn from(value: bool) -> Self {
        Atom::Boolean(value)
    }
}

impl From<Symbol> for Atom {
    fn from(name: Symbol) -> Self {
        Atom::Name(name)
    }
}

impl From<Program> for Atom {
    fn from(program: Program) -> Self {
        Atom::Program(program)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Integer(v) => write!(f, "{}", v),
            // Debug formatting keeps a decimal point or exponent, so the
            // token parses back as a float rather than an integer
            Atom::Float(v) => write!(f, "{:?}", v),
            Atom::Boolean(v) => write!(f, "{}", v),
            Atom::Name(name) => write!(f, "{}", name),
            Atom::Program(program) => write!(f, "{}", program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_shares_storage() {
        let a = Symbol::new("integer.+");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "integer.+");
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn test_atom_points() {
        assert_eq!(Atom::Integer(3).points(), 1);
        assert_eq!(Atom::name("float.*").points(), 1);
        let nested = Program::from_atoms(vec![Atom::Integer(1), Atom::Integer(2)]);
        assert_eq!(Atom::Program(nested).points(), 3);
    }

    #[test]
    fn test_atom_display() {
        assert_eq!(Atom::Integer(-4).to_string(), "-4");
        assert_eq!(Atom::Float(3.0).to_string(), "3.0");
        assert_eq!(Atom::Float(0.25).to_string(), "0.25");
        assert_eq!(Atom::Boolean(true).to_string(), "true");
        assert_eq!(Atom::name("exec.k").to_string(), "exec.k");
    }

    #[test]
    fn test_float_equality_is_reflexive() {
        let nan = Atom::Float(f32::NAN);
        assert_eq!(nan, nan.clone());
        let nested = Program::from_atoms(vec![nan, Atom::Float(f32::INFINITY)]);
        assert_eq!(nested, nested.clone());
        assert_ne!(Atom::Float(1.0), Atom::Integer(1));
        assert_ne!(Atom::Float(0.0), Atom::Float(-0.0));
    }

    #[test]
    fn test_accessors() {
        let program = Atom::Program(Program::new());
        assert!(program.is_program());
        assert!(program.as_program().is_some());
        assert!(program.as_name().is_none());
        assert_eq!(Atom::name("x").as_name().map(Symbol::as_str), Some("x"));
    }
}
