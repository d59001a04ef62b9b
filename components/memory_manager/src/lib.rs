//! Memory Manager - script-lifetime allocation
//!
//! This component provides:
//! - A registry-backed memory pool with generation-checked handles
//! - Custom reclaim functions run on free and on pool teardown
//! - Bounded growable vectors with checked `n + n/2 + 1` growth
//! - An identifier interner for source file names

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod growable;
pub mod interner;
pub mod pool;

// Re-export main types
pub use error::{PoolError, PoolResult};
pub use growable::{grow_capacity, GrowVec, DEFAULT_LIMIT};
pub use interner::{IdentId, Interner};
pub use pool::{Handle, Payload, Pool, Reclaim};
