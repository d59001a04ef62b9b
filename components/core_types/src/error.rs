//! Error taxonomy shared by the compiler and the virtual machine.
//!
//! - Compile-time binding errors are collected as [`Diagnostic`]s and
//!   reported together in [`SieveError::Compile`].
//! - Pool errors are fatal and end the whole compile or run attempt.
//! - Everything else raised while running a message aborts that message only.

use memory_manager::PoolError;

use crate::Locus;

/// A compile-time diagnostic tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{locus}: {message}")]
pub struct Diagnostic {
    /// Where the problem was found
    pub locus: Locus,
    /// Description of the problem
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(locus: Locus, message: impl Into<String>) -> Self {
        Self {
            locus,
            message: message.into(),
        }
    }
}

/// Errors raised while compiling or running a script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SieveError {
    /// Internal memory error; never recoverable
    #[error("internal error: {0}")]
    Pool(#[from] PoolError),

    /// The script failed to compile
    #[error("script compilation failed with {} error(s)", diagnostics.len())]
    Compile {
        /// Every diagnostic recorded during compilation
        diagnostics: Vec<Diagnostic>,
    },

    /// A handler aborted evaluation of the current message
    #[error("{locus}: {message}")]
    Runtime {
        /// Locus of the failing instruction
        locus: Locus,
        /// Description of the failure
        message: String,
    },

    /// `POP` with an empty value stack
    #[error("stack underflow at pc {pc}")]
    StackUnderflow {
        /// Program counter of the failing instruction
        pc: usize,
    },

    /// `PUSH` beyond the configured stack depth
    #[error("stack overflow at pc {pc}")]
    StackOverflow {
        /// Program counter of the failing instruction
        pc: usize,
    },

    /// A branch left the program
    #[error("invalid jump at pc {pc}: target {target} is outside the program")]
    InvalidJump {
        /// Program counter of the branch
        pc: usize,
        /// Computed absolute target
        target: isize,
    },

    /// The message store failed to deliver data
    #[error("message access failed: {0}")]
    Message(String),

    /// Invalid command registration
    #[error("registry error: {0}")]
    Registry(String),
}

impl SieveError {
    /// Shorthand for a [`SieveError::Runtime`] error.
    pub fn runtime(locus: &Locus, message: impl Into<String>) -> Self {
        SieveError::Runtime {
            locus: locus.clone(),
            message: message.into(),
        }
    }

    /// Whether the error must terminate the whole compile or run attempt
    /// rather than just the current message.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SieveError::Pool(_))
    }

    /// Diagnostics of a failed compilation, empty for other errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SieveError::Compile { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

/// Result alias used across the workspace.
pub type SieveResult<T> = Result<T, SieveError>;
