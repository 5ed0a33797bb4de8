//! The typed stacks an interpreter works on.

use psh_core::Stack;
use psh_ir::{Atom, Symbol};
use std::fmt;

/// Stack types addressable by name in instruction names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Integer,
    Float,
    Boolean,
    Name,
    Code,
    Exec,
    Input,
}

impl StackKind {
    /// Kinds that get the shared `pop swap rot ...` instruction family
    pub const MANIPULABLE: [StackKind; 6] = [
        StackKind::Integer,
        StackKind::Float,
        StackKind::Boolean,
        StackKind::Name,
        StackKind::Code,
        StackKind::Exec,
    ];

    /// Instruction name prefix, e.g. `integer` in `integer.dup`
    pub fn prefix(&self) -> &'static str {
        match self {
            StackKind::Integer => "integer",
            StackKind::Float => "float",
            StackKind::Boolean => "boolean",
            StackKind::Name => "name",
            StackKind::Code => "code",
            StackKind::Exec => "exec",
            StackKind::Input => "input",
        }
    }
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// The stacks that are swapped out when a frame is pushed
#[derive(Debug, Clone)]
pub struct StackSet {
    pub integer: Stack<i32>,
    pub float: Stack<f32>,
    pub boolean: Stack<bool>,
    pub name: Stack<Symbol>,
    pub code: Stack<Atom>,
}

impl StackSet {
    pub fn new() -> Self {
        Self {
            integer: Stack::new("integer"),
            float: Stack::new("float"),
            boolean: Stack::new("boolean"),
            name: Stack::new("name"),
            code: Stack::new("code"),
        }
    }

    pub fn clear(&mut self) {
        self.integer.clear();
        self.float.clear();
        self.boolean.clear();
        self.name.clear();
        self.code.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.integer.is_empty()
            && self.float.is_empty()
            && self.boolean.is_empty()
            && self.name.is_empty()
            && self.code.is_empty()
    }
}

impl Default for StackSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Top values carried across a frame boundary.
///
/// Numeric and boolean tops default to zero and false when their stack is
/// empty; name and code tops are only carried when present.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTops {
    pub integer: i32,
    pub float: f32,
    pub boolean: bool,
    pub name: Option<Symbol>,
    pub code: Option<Atom>,
}

impl FrameTops {
    pub fn capture(stacks: &StackSet) -> Self {
        Self {
            integer: stacks.integer.top().copied().unwrap_or(0),
            float: stacks.float.top().copied().unwrap_or(0.0),
            boolean: stacks.boolean.top().copied().unwrap_or(false),
            name: stacks.name.top().cloned(),
            code: stacks.code.top().cloned(),
        }
    }

    pub fn seed(self, stacks: &mut StackSet) {
        stacks.float.push(self.float);
        stacks.integer.push(self.integer);
        stacks.boolean.push(self.boolean);
        if let Some(name) = self.name {
            stacks.name.push(name);
        }
        if let Some(code) = self.code {
            stacks.code.push(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_defaults_on_empty() {
        let tops = FrameTops::capture(&StackSet::new());
        assert_eq!(tops.integer, 0);
        assert_eq!(tops.float, 0.0);
        assert!(!tops.boolean);
        assert!(tops.name.is_none());
        assert!(tops.code.is_none());
    }

    #[test]
    fn test_seed_copies_tops_only() {
        let mut caller = StackSet::new();
        caller.integer.extend([1, 2, 3]);
        caller.name.push(Symbol::new("x"));

        let mut callee = StackSet::new();
        FrameTops::capture(&caller).seed(&mut callee);

        assert_eq!(callee.integer.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(callee.float.depth(), 1);
        assert_eq!(callee.boolean.depth(), 1);
        assert_eq!(callee.name.top().map(Symbol::as_str), Some("x"));
        assert!(callee.code.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut stacks = StackSet::new();
        stacks.float.push(1.5);
        stacks.code.push(Atom::Integer(1));
        assert!(!stacks.is_empty());
        stacks.clear();
        assert!(stacks.is_empty());
    }

    #[test]
    fn test_prefixes() {
        let names: Vec<&str> = StackKind::MANIPULABLE.iter().map(StackKind::prefix).collect();
        assert_eq!(names, vec!["integer", "float", "boolean", "name", "code", "exec"]);
        assert_eq!(StackKind::Input.to_string(), "input");
    }
}
