//! Identifier interning for locus tracking.
//!
//! Source file names are stored once in the pool and referred to by a small
//! integer id, which is what the `SOURCE` instruction carries.

use crate::error::{PoolError, PoolResult};
use crate::growable::GrowVec;
use crate::pool::{Handle, Pool};

/// Identifier id returned by [`Interner::intern`].
pub type IdentId = usize;

/// Table of pool-owned identifier strings.
#[derive(Debug, Default)]
pub struct Interner {
    names: GrowVec<Handle>,
}

impl Interner {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table holding at most `limit` identifiers.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            names: GrowVec::with_limit(limit),
        }
    }

    /// Returns the id of `name`, storing a pool copy on first sight.
    ///
    /// Lookup is a linear scan; identifier tables hold a handful of file
    /// names per script.
    pub fn intern(&mut self, pool: &mut Pool, name: &str) -> PoolResult<IdentId> {
        for (id, handle) in self.names.iter().enumerate() {
            if pool.string(*handle)? == name {
                return Ok(id);
            }
        }

        let handle = pool.duplicate_string(name)?;
        self.names.push(handle)
    }

    /// Resolves an id back to its name.
    pub fn resolve<'p>(&self, pool: &'p Pool, id: IdentId) -> PoolResult<&'p str> {
        let handle = self
            .names
            .get(id)
            .ok_or(PoolError::UnknownIdentifier(id))?;
        pool.string(*handle)
    }

    /// Number of interned identifiers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
