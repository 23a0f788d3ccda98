//! Lexical scopes as a stack of frames.

use std::collections::HashMap;

use crate::symbols::Symbol;

/// One scope: names in declaration order plus a lookup index.
#[derive(Debug, Default)]
struct Frame {
    order: Vec<(String, Symbol)>,
    index: HashMap<String, Symbol>,
}

/// The chain of scopes currently open during binding. The bottom frame is
/// the global scope.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<Frame>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        ScopeChain::new()
    }
}

impl ScopeChain {
    /// A chain holding only an empty global scope.
    pub fn new() -> Self {
        ScopeChain {
            frames: vec![Frame::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Close the innermost scope. The global scope is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Declare `name` in the innermost scope. Returns `false` if that scope
    /// already has it; shadowing an outer scope is fine.
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        if frame.index.contains_key(name) {
            return false;
        }
        frame.index.insert(name.to_string(), symbol);
        frame.order.push((name.to_string(), symbol));
        true
    }

    /// Resolve `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.index.get(name).copied())
    }

    /// Resolve `name` in the innermost scope only.
    pub fn lookup_current(&self, name: &str) -> Option<Symbol> {
        self.frames
            .last()
            .and_then(|frame| frame.index.get(name).copied())
    }

    /// Symbols of the innermost scope in declaration order.
    pub fn current_symbols(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.frames
            .last()
            .into_iter()
            .flat_map(|frame| frame.order.iter().map(|(name, symbol)| (name.as_str(), *symbol)))
    }
}
