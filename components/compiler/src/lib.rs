//! Filter script compiler
//!
//! Binds the arguments of every command in a parsed [`Script`] against the
//! [`Registry`] and lowers the result to bytecode.
//!
//! # Overview
//!
//! - [`Script`] / [`Node`] / [`TestExpr`] / [`Command`] - Parser hand-off
//! - [`bind`] - Argument binder
//! - [`CodeGenerator`] - Lowers bound commands to a [`Program`]
//! - [`Compiler`] - Entry point with resource limits
//!
//! # Example
//!
//! ```
//! use compiler::{Command, Compiler, Node, Script};
//! use core_types::{Invocation, Locus, Registry, SieveResult};
//!
//! fn keep(inv: &mut Invocation<'_>) -> SieveResult<bool> {
//!     inv.record("keep", "");
//!     Ok(true)
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_action("keep", keep, vec![], vec![], vec![]).unwrap();
//!
//! let script = Script::new(vec![Node::from(Command::new("keep", Locus::new("f", 1)))]);
//! let compiled = Compiler::new(&registry).compile(&script).unwrap();
//! assert_eq!(compiled.program.len(), 4);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ast;
pub mod binder;
pub mod codegen;
pub mod error;

pub use ast::{Command, Node, Script, TestExpr};
pub use binder::{bind, Bound};
pub use codegen::{CodeGenerator, CompiledScript};
pub use error::BindError;

use bytecode_system::Program;
use core_types::{Registry, SieveResult};
use memory_manager::{Pool, DEFAULT_LIMIT};

/// Compiles scripts against a registry.
#[derive(Debug, Clone)]
pub struct Compiler<'r> {
    registry: &'r Registry,
    pool_limit: Option<usize>,
    max_code_size: usize,
}

impl<'r> Compiler<'r> {
    /// Create a compiler with default limits
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            pool_limit: None,
            max_code_size: DEFAULT_LIMIT,
        }
    }

    /// Cap the bytes the script may allocate from its pool
    pub fn with_pool_limit(mut self, limit: Option<usize>) -> Self {
        self.pool_limit = limit;
        self
    }

    /// Cap the number of emitted instructions
    pub fn with_max_code_size(mut self, max: usize) -> Self {
        self.max_code_size = max;
        self
    }

    /// Compile `script`
    pub fn compile(&self, script: &Script) -> SieveResult<CompiledScript> {
        let pool = match self.pool_limit {
            Some(limit) => Pool::with_limit(limit),
            None => Pool::new(),
        };
        let program = Program::with_limit(self.max_code_size);
        CodeGenerator::new(self.registry, program, pool).generate(script)
    }
}
