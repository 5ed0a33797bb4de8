//! Typed LIFO stacks.
//!
//! Depth arguments count from the top: depth 0 is the top item. Index
//! arguments (`get`) count from the bottom.

use crate::{Error, Result};
use std::fmt;

#[derive(Clone, PartialEq)]
pub struct Stack<T> {
    label: &'static str,
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            items: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or(Error::StackUnderflow(self.label))
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Item at `depth` below the top
    pub fn peek(&self, depth: usize) -> Option<&T> {
        self.items.len().checked_sub(depth + 1).map(|i| &self.items[i])
    }

    /// Item at `index` counted from the bottom
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bottom-to-top iteration
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Exchange the top two items
    pub fn swap(&mut self) {
        let n = self.items.len();
        if n > 1 {
            self.items.swap(n - 1, n - 2);
        }
    }

    /// Move the third item to the top: `a b c` becomes `b c a`
    pub fn rot(&mut self) {
        let n = self.items.len();
        if n > 2 {
            let third = self.items.remove(n - 3);
            self.items.push(third);
        }
    }

    /// Remove the item at `depth`, clamped to the stack
    pub fn remove_at(&mut self, depth: usize) -> Option<T> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        let depth = depth.min(n - 1);
        Some(self.items.remove(n - 1 - depth))
    }

    /// Insert `item` so that it ends up at `depth`, clamped to the stack
    pub fn insert_at(&mut self, depth: usize, item: T) {
        let n = self.items.len();
        let depth = depth.min(n);
        self.items.insert(n - depth, item);
    }

    /// Move the top item down to `depth`
    pub fn shove(&mut self, depth: usize) {
        if let Some(item) = self.items.pop() {
            self.insert_at(depth, item);
        }
    }

    /// Move the item at `depth` to the top
    pub fn yank(&mut self, depth: usize) {
        if let Some(item) = self.remove_at(depth) {
            self.items.push(item);
        }
    }
}

impl<T: Clone> Stack<T> {
    pub fn dup(&mut self) {
        if let Some(top) = self.items.last().cloned() {
            self.items.push(top);
        }
    }

    /// Copy the item at `depth` to the top
    pub fn yank_dup(&mut self, depth: usize) {
        let n = self.items.len();
        if n > 0 {
            let item = self.items[n - 1 - depth.min(n - 1)].clone();
            self.items.push(item);
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new("custom")
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T: fmt::Display> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("label", &self.label)
            .field("items", &self.items)
            .finish()
    }
}

/// Type-independent stack manipulation, used by the instructions every
/// stack type shares
pub trait StackOps {
    fn depth(&self) -> usize;
    fn discard(&mut self);
    fn dup(&mut self);
    fn swap(&mut self);
    fn rot(&mut self);
    fn flush(&mut self);
    fn shove(&mut self, depth: usize);
    fn yank(&mut self, depth: usize);
    fn yank_dup(&mut self, depth: usize);
}

impl<T: Clone> StackOps for Stack<T> {
    fn depth(&self) -> usize {
        self.items.len()
    }

    fn discard(&mut self) {
        self.items.pop();
    }

    fn dup(&mut self) {
        Stack::dup(self);
    }

    fn swap(&mut self) {
        Stack::swap(self);
    }

    fn rot(&mut self) {
        Stack::rot(self);
    }

    fn flush(&mut self) {
        self.items.clear();
    }

    fn shove(&mut self, depth: usize) {
        Stack::shove(self, depth);
    }

    fn yank(&mut self, depth: usize) {
        Stack::yank(self, depth);
    }

    fn yank_dup(&mut self, depth: usize) {
        Stack::yank_dup(self, depth);
    }
}
