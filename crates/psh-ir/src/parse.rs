//! Text syntax for programs.
//!
//! Tokens are separated by whitespace and parentheses. Each token becomes an
//! integer if it parses as one, otherwise a finite float, otherwise a
//! boolean literal, otherwise a name.

use crate::atom::Atom;
use crate::program::Program;
use psh_core::{Error, Result};
use std::str::FromStr;

/// Parse program text.
///
/// Text consisting of exactly one parenthesized group yields that group;
/// anything else is treated as the contents of an implicit outer program.
pub fn parse_program(text: &str) -> Result<Program> {
    let mut open: Vec<Vec<Atom>> = Vec::new();
    let mut top: Vec<Atom> = Vec::new();

    for token in tokenize(text) {
        match token {
            "(" => open.push(std::mem::take(&mut top)),
            ")" => {
                let finished = Program::from_atoms(std::mem::take(&mut top));
                top = open
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected ')'".to_string()))?;
                top.push(Atom::Program(finished));
            }
            literal => top.push(parse_atom(literal)),
        }
    }

    if !open.is_empty() {
        return Err(Error::Parse(format!("{} unclosed '('", open.len())));
    }

    if top.len() == 1 && top[0].is_program() {
        if let Some(Atom::Program(program)) = top.pop() {
            return Ok(program);
        }
    }
    Ok(Program::from_atoms(top))
}

/// Classify a single literal token
pub fn parse_atom(token: &str) -> Atom {
    if let Ok(value) = token.parse::<i32>() {
        return Atom::Integer(value);
    }
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => return Atom::Float(value),
        _ => {}
    }
    match token {
        "true" => Atom::Boolean(true),
        "false" => Atom::Boolean(false),
        name => Atom::name(name),
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().flat_map(|word| {
        let mut pieces = Vec::new();
        let mut start = 0;
        for (i, c) in word.char_indices() {
            if c == '(' || c == ')' {
                if start < i {
                    pieces.push(&word[start..i]);
                }
                pieces.push(&word[i..i + 1]);
                start = i + 1;
            }
        }
        if start < word.len() {
            pieces.push(&word[start..]);
        }
        pieces
    })
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_program(s)
    }
}
