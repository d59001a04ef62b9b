//! Pool error types.
//!
//! Every variant describes an unrecoverable internal condition: callers are
//! expected to abandon the whole compile or run attempt when one surfaces.

use crate::pool::Handle;

/// Errors raised by the memory pool and the structures built on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The underlying allocator (or the configured pool limit) refused a request.
    #[error("not enough memory: failed to allocate {requested} bytes")]
    OutOfMemory {
        /// Number of bytes that were requested
        requested: usize,
    },

    /// The handle is not registered in the pool, or was already freed.
    #[error("operation on unregistered memory cell {0}")]
    UnknownHandle(Handle),

    /// A growable vector was asked to grow beyond its limit.
    #[error("capacity overflow: requested {requested} elements, limit is {limit}")]
    CapacityOverflow {
        /// Number of elements that were requested
        requested: usize,
        /// Maximum number of elements allowed
        limit: usize,
    },

    /// The cell exists but holds a payload of a different type.
    #[error("memory cell {0} holds a payload of a different type")]
    TypeMismatch(Handle),

    /// The identifier table has no entry with this id.
    #[error("identifier {0} out of range")]
    UnknownIdentifier(usize),
}

/// Result alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
