//! Growable vectors with an explicit growth policy.
//!
//! Capacity grows as `n' = n + n/2 + 1` until the request fits. All
//! arithmetic is checked: a request that cannot be represented, or that
//! exceeds the vector's element limit, is reported as
//! [`PoolError::CapacityOverflow`] instead of wrapping or panicking.

use std::mem;

use crate::error::{PoolError, PoolResult};

/// Default element limit for growable vectors.
pub const DEFAULT_LIMIT: usize = 1 << 20;

/// Computes the capacity to grow to so that `needed` elements fit.
///
/// The returned capacity is always strictly greater than `current`.
///
/// # Examples
///
/// ```
/// use memory_manager::grow_capacity;
///
/// assert_eq!(grow_capacity(0, 1, 100).unwrap(), 1);
/// assert_eq!(grow_capacity(4, 5, 100).unwrap(), 7);
/// assert!(grow_capacity(90, 200, 100).is_err());
/// ```
pub fn grow_capacity(current: usize, needed: usize, limit: usize) -> PoolResult<usize> {
    let needed = needed.max(current.saturating_add(1));
    if needed > limit {
        return Err(PoolError::CapacityOverflow {
            requested: needed,
            limit,
        });
    }

    let mut capacity = current;
    while capacity < needed {
        capacity = capacity
            .checked_add(capacity / 2)
            .and_then(|n| n.checked_add(1))
            .ok_or(PoolError::CapacityOverflow {
                requested: needed,
                limit,
            })?;
    }

    Ok(capacity.min(limit))
}

/// An append-oriented vector whose growth is bounded and fallible.
#[derive(Debug, Clone)]
pub struct GrowVec<T> {
    items: Vec<T>,
    limit: usize,
}

impl<T> GrowVec<T> {
    /// Creates an empty vector with the default element limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Creates an empty vector that refuses to hold more than `limit` elements.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
        }
    }

    /// Appends an item and returns its index.
    pub fn push(&mut self, item: T) -> PoolResult<usize> {
        self.reserve(1)?;
        let index = self.items.len();
        self.items.push(item);
        Ok(index)
    }

    /// Makes room for `additional` more items.
    pub fn reserve(&mut self, additional: usize) -> PoolResult<()> {
        let needed = self
            .items
            .len()
            .checked_add(additional)
            .ok_or(PoolError::CapacityOverflow {
                requested: usize::MAX,
                limit: self.limit,
            })?;
        if needed > self.limit {
            return Err(PoolError::CapacityOverflow {
                requested: needed,
                limit: self.limit,
            });
        }
        if needed <= self.items.capacity() {
            return Ok(());
        }

        let capacity = grow_capacity(self.items.capacity(), needed, self.limit)?;
        let bytes = capacity
            .checked_mul(mem::size_of::<T>())
            .filter(|bytes| *bytes <= isize::MAX as usize)
            .ok_or(PoolError::CapacityOverflow {
                requested: capacity,
                limit: self.limit,
            })?;
        self.items
            .try_reserve_exact(capacity - self.items.len())
            .map_err(|_| PoolError::OutOfMemory { requested: bytes })
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currently allocated capacity.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Element limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable item at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Borrow the stored items.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the stored items.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}
