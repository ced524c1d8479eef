//! Nested assertion scopes.
//!
//! A [`ScopedStack`] is an ordered list of scopes, innermost last, stored
//! flat: items live in one vector and each pushed scope remembers where it
//! starts. The base scope exists from construction and can never be popped.
//!
//! ```
//! use boolean_lp::stack::ScopedStack;
//!
//! let mut stack = ScopedStack::new();
//! stack.add(1);
//! stack.push();
//! stack.add(2);
//! assert_eq!(stack.as_slice(), &[1, 2]);
//! stack.pop().unwrap();
//! assert_eq!(stack.as_slice(), &[1]);
//! assert!(stack.pop().is_err());
//! ```

use log::debug;

use crate::error::{Result, SolverError};

#[derive(Debug, Clone)]
pub struct ScopedStack<T> {
    items: Vec<T>,
    /// Start offset (into `items`) of every scope above the base.
    marks: Vec<usize>,
}

impl<T> ScopedStack<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Opens a new empty scope.
    pub fn push(&mut self) {
        self.marks.push(self.items.len());
        debug!("push: depth = {}", self.depth());
    }

    /// Drops the innermost scope together with everything added to it.
    pub fn pop(&mut self) -> Result<()> {
        let mark = self.marks.pop().ok_or(SolverError::StackUnderflow)?;
        debug!(
            "pop: dropping {} items, depth = {}",
            self.items.len() - mark,
            self.depth()
        );
        self.items.truncate(mark);
        Ok(())
    }

    /// Appends `item` to the innermost scope.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Number of scopes above the base.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All live items, outermost scope first.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for ScopedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
