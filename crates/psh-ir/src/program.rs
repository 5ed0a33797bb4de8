//! Program trees and point addressing.
//!
//! Points are numbered in pre-order. Point 0 is the whole program; point
//! `k >= 1` is the k-th atom met when walking the tree depth-first,
//! left-to-right, where a nested program is counted before its contents.

use crate::atom::Atom;
use psh_core::Stack;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// An ordered, immutable sequence of atoms.
///
/// Cloning is cheap and edits return new programs, so a subtree may be
/// shared freely between parents and offspring.
#[derive(Clone, PartialEq, Default)]
pub struct Program {
    atoms: Arc<Vec<Atom>>,
}

/// A run of sibling atoms addressed for two-point crossover
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Child positions leading from the root to the program holding the run
    pub parent: Vec<usize>,
    /// Positions of the run within that program
    pub range: Range<usize>,
    pub atoms: Vec<Atom>,
}

impl Segment {
    pub fn points(&self) -> usize {
        self.atoms.iter().map(Atom::points).sum()
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self {
            atoms: Arc::new(atoms),
        }
    }

    /// Number of immediate children
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn child(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Pre-order point count, root included
    pub fn points(&self) -> usize {
        1 + self.atoms.iter().map(Atom::points).sum::<usize>()
    }

    /// Points below the root. This is the size limited by
    /// `max_points_in_program` and the range cut-points are drawn from.
    pub fn size(&self) -> usize {
        self.points() - 1
    }

    /// Pre-order walk over every point below the root
    pub fn iter_points(&self) -> PointIter<'_> {
        PointIter {
            stack: vec![self.atoms.iter()],
            index: 0,
        }
    }

    /// The subtree or leaf at `index`; point 0 is the whole program
    pub fn extract_point(&self, index: usize) -> Option<Atom> {
        if index == 0 {
            return Some(Atom::Program(self.clone()));
        }
        self.iter_points()
            .nth(index - 1)
            .map(|(_, atom)| atom.clone())
    }

    /// Point count of the subtree rooted at `index`
    pub fn subtree_points(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(self.points());
        }
        self.iter_points()
            .nth(index - 1)
            .map(|(_, atom)| atom.points())
    }

    /// A copy of this program with the point at `index` replaced.
    ///
    /// Replacing point 0 with a program yields that program; with any other
    /// atom, a program holding just that atom.
    pub fn replace_point(&self, index: usize, replacement: Atom) -> Option<Program> {
        let path = self.locate(index)?;
        match path.split_last() {
            None => Some(match replacement {
                Atom::Program(program) => program,
                atom => Program::from_atoms(vec![atom]),
            }),
            Some((&position, parent)) => {
                Some(self.splice_at(parent, position..position + 1, vec![replacement]))
            }
        }
    }

    /// The run of siblings starting at point `low` and extending through
    /// every following sibling whose first point is at most `high`.
    ///
    /// Returns `None` for point 0 or an index past the end.
    pub fn segment(&self, low: usize, high: usize) -> Option<Segment> {
        let path = self.locate(low)?;
        let (&start, parent) = path.split_last()?;
        let siblings = self.program_at(parent)?.atoms();

        let mut end = start + 1;
        let mut next_point = low + siblings[start].points();
        while end < siblings.len() && next_point <= high {
            next_point += siblings[end].points();
            end += 1;
        }

        Some(Segment {
            parent: parent.to_vec(),
            range: start..end,
            atoms: siblings[start..end].to_vec(),
        })
    }

    /// A copy of this program with `segment` replaced by `replacement`
    pub fn splice(&self, segment: &Segment, replacement: Vec<Atom>) -> Program {
        self.splice_at(&segment.parent, segment.range.clone(), replacement)
    }

    /// Push the children so that popping yields them left to right
    pub fn push_all_reversed(&self, stack: &mut Stack<Atom>) {
        stack.extend(self.atoms.iter().rev().cloned());
    }

    /// Child positions leading from the root to point `index`
    fn locate(&self, index: usize) -> Option<Vec<usize>> {
        if index == 0 {
            return Some(Vec::new());
        }

        let mut remaining = index - 1;
        let mut path = Vec::new();
        let mut program = self;

        'descend: loop {
            for (position, atom) in program.atoms.iter().enumerate() {
                let span = atom.points();
                if remaining < span {
                    path.push(position);
                    if remaining == 0 {
                        return Some(path);
                    }
                    remaining -= 1;
                    program = atom.as_program()?;
                    continue 'descend;
                }
                remaining -= span;
            }
            return None;
        }
    }

    fn program_at(&self, path: &[usize]) -> Option<&Program> {
        let mut program = self;
        for &position in path {
            program = program.atoms.get(position)?.as_program()?;
        }
        Some(program)
    }

    fn splice_at(&self, parent: &[usize], range: Range<usize>, replacement: Vec<Atom>) -> Program {
        let mut atoms: Vec<Atom> = self.atoms.as_ref().clone();
        match parent.split_first() {
            None => {
                atoms.splice(range, replacement);
            }
            Some((&position, rest)) => {
                let rebuilt = match &atoms[position] {
                    Atom::Program(child) => child.splice_at(rest, range, replacement),
                    _ => return self.clone(),
                };
                atoms[position] = Atom::Program(rebuilt);
            }
        }
        Program::from_atoms(atoms)
    }
}

impl From<Vec<Atom>> for Program {
    fn from(atoms: Vec<Atom>) -> Self {
        Self::from_atoms(atoms)
    }
}

impl FromIterator<Atom> for Program {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self::from_atoms(iter.into_iter().collect())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", atom)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program{}", self)
    }
}

/// Iterator over `(point index, atom)` pairs in pre-order
pub struct PointIter<'a> {
    stack: Vec<std::slice::Iter<'a, Atom>>,
    index: usize,
}

impl<'a> Iterator for PointIter<'a> {
    type Item = (usize, &'a Atom);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(atom) => {
                    self.index += 1;
                    if let Atom::Program(nested) = atom {
                        self.stack.push(nested.atoms.iter());
                    }
                    return Some((self.index, atom));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
