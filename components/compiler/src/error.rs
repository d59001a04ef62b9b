//! Binding error types

use core_types::{CheckError, CommandKind, DataType};
use memory_manager::PoolError;

/// Why a command could not be bound or compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("unknown {kind} `{name}`")]
    UnknownCommand { kind: CommandKind, name: String },

    #[error("invalid tag name `{tag}` for `{command}`")]
    InvalidTag { tag: String, command: String },

    #[error("required argument for tag `{tag}` is missing")]
    MissingTagValue { tag: String },

    #[error("type mismatch in argument to tag `{tag}`: expected {expected}, got {actual}")]
    TagTypeMismatch {
        tag: String,
        expected: DataType,
        actual: DataType,
    },

    #[error(
        "type mismatch in argument {position} to `{command}`: expected {expected}, got {actual}"
    )]
    TypeMismatch {
        command: String,
        position: usize,
        expected: DataType,
        actual: DataType,
    },

    #[error("too many arguments in call to `{command}`")]
    TooManyArguments { command: String },

    #[error("too few arguments in call to `{command}`")]
    TooFewArguments { command: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error("empty test list in {0}")]
    EmptyTestList(&'static str),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<CheckError> for BindError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Rejected(message) => BindError::Rejected { message },
            CheckError::Pool(err) => BindError::Pool(err),
        }
    }
}

impl BindError {
    /// Pool errors end the whole compilation; everything else is
    /// reported against the offending node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BindError::Pool(_))
    }
}
