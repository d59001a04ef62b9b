//! Execution context for one evaluation

use core_types::{ActionRecord, Locus};

/// Runtime state of one pass over the program.
///
/// A fresh context is created for every message, and for every
/// disassembly.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Index of the next instruction
    pub pc: usize,
    /// Result of the last test
    pub reg: bool,
    /// Values saved by `PUSH`
    pub stack: Vec<bool>,
    /// Locus set by the last `SOURCE`/`LINE`
    pub locus: Locus,
    /// Number of `ACTION` instructions executed
    pub action_count: usize,
    /// Action log
    pub actions: Vec<ActionRecord>,
    /// Set when a handler asked to stop
    pub halted: bool,
    /// Collected listing, present only when disassembling
    pub listing: Option<Vec<String>>,
}

impl ExecutionContext {
    /// Context for evaluating a message
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a disassembly pass
    pub fn disassembly() -> Self {
        Self {
            listing: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Whether this pass only lists instructions
    pub fn is_disassembly(&self) -> bool {
        self.listing.is_some()
    }
}
