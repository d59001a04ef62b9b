//! Script-lifetime memory pool.
//!
//! The pool owns every allocation made while compiling or running a script.
//! Each allocation is registered as a cell together with the way it must be
//! reclaimed, and is addressed through a generation-checked [`Handle`]. A
//! handle that was never issued, or whose cell was already freed, is rejected
//! with [`PoolError::UnknownHandle`] rather than touching foreign memory.
//!
//! Dropping the pool reclaims every cell that is still registered, which is
//! what makes an aborted compilation or run leak-free.

use std::any::Any;
use std::fmt;
use std::mem;

use crate::error::{PoolError, PoolResult};

/// Generation-checked reference to a pool cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index of the cell.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation the handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Payload stored in a cell.
pub type Payload = Box<dyn Any + Send>;

/// How a cell's payload is released.
pub enum Reclaim {
    /// Plain drop of the payload.
    Drop,
    /// Hand the payload to a custom function.
    With(Box<dyn FnOnce(Payload) + Send>),
}

impl Reclaim {
    /// Wraps a custom reclaim function.
    pub fn with(f: impl FnOnce(Payload) + Send + 'static) -> Self {
        Reclaim::With(Box::new(f))
    }

    fn run(self, payload: Payload) {
        match self {
            Reclaim::Drop => drop(payload),
            Reclaim::With(f) => f(payload),
        }
    }
}

impl fmt::Debug for Reclaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reclaim::Drop => write!(f, "Drop"),
            Reclaim::With(_) => write!(f, "With(..)"),
        }
    }
}

struct Cell {
    payload: Payload,
    size: usize,
    reclaim: Reclaim,
}

struct Slot {
    generation: u32,
    cell: Option<Cell>,
}

/// Arena of registered memory cells.
///
/// # Examples
///
/// ```
/// use memory_manager::{Pool, PoolError};
///
/// let mut pool = Pool::new();
/// let handle = pool.duplicate_string("INBOX").unwrap();
/// assert_eq!(pool.string(handle).unwrap(), "INBOX");
///
/// pool.free(handle).unwrap();
/// assert!(matches!(pool.free(handle), Err(PoolError::UnknownHandle(_))));
/// ```
pub struct Pool {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    live: usize,
    allocated: usize,
    limit: Option<usize>,
}

impl Pool {
    /// Creates an unbounded pool.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
            allocated: 0,
            limit: None,
        }
    }

    /// Creates a pool that refuses to account more than `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        let mut pool = Self::new();
        pool.limit = Some(limit);
        pool
    }

    /// Allocates a zeroed byte buffer of `size` bytes.
    pub fn allocate(&mut self, size: usize, reclaim: Reclaim) -> PoolResult<Handle> {
        let buffer = zeroed_buffer(size)?;
        self.register(Box::new(buffer), size, reclaim)
    }

    /// Stores an arbitrary value, reclaimed by dropping it.
    pub fn insert<T: Any + Send>(&mut self, value: T) -> PoolResult<Handle> {
        self.insert_with(value, Reclaim::Drop)
    }

    /// Stores an arbitrary value with a custom reclaim function.
    pub fn insert_with<T: Any + Send>(&mut self, value: T, reclaim: Reclaim) -> PoolResult<Handle> {
        self.register(Box::new(value), mem::size_of::<T>(), reclaim)
    }

    /// Copies a string into the pool.
    pub fn duplicate_string(&mut self, s: &str) -> PoolResult<Handle> {
        let mut copy = String::new();
        copy.try_reserve_exact(s.len())
            .map_err(|_| PoolError::OutOfMemory { requested: s.len() })?;
        copy.push_str(s);
        let size = copy.len();
        self.register(Box::new(copy), size, Reclaim::Drop)
    }

    /// Resizes a byte buffer in place, keeping its handle.
    ///
    /// With `None` this behaves as [`Pool::allocate`].
    pub fn reallocate(&mut self, handle: Option<Handle>, new_size: usize) -> PoolResult<Handle> {
        let Some(handle) = handle else {
            return self.allocate(new_size, Reclaim::Drop);
        };

        let old_size = self.cell(handle)?.size;
        self.charge(new_size.saturating_sub(old_size))?;

        let cell = self.cell_mut(handle)?;
        let buffer = cell
            .payload
            .downcast_mut::<Vec<u8>>()
            .ok_or(PoolError::TypeMismatch(handle))?;
        if new_size > buffer.len() {
            buffer
                .try_reserve_exact(new_size - buffer.len())
                .map_err(|_| PoolError::OutOfMemory {
                    requested: new_size,
                })?;
        }
        buffer.resize(new_size, 0);
        cell.size = new_size;

        self.allocated = self.allocated - old_size + new_size;
        Ok(handle)
    }

    /// Releases a cell, running its reclaim function.
    pub fn free(&mut self, handle: Handle) -> PoolResult<()> {
        self.cell(handle)?;
        let slot = &mut self.slots[handle.index()];
        let Some(cell) = slot.cell.take() else {
            return Err(PoolError::UnknownHandle(handle));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(handle.index);
        self.live -= 1;
        self.allocated -= cell.size;
        cell.reclaim.run(cell.payload);
        Ok(())
    }

    /// Borrow a stored value.
    pub fn get<T: Any>(&self, handle: Handle) -> PoolResult<&T> {
        self.cell(handle)?
            .payload
            .downcast_ref::<T>()
            .ok_or(PoolError::TypeMismatch(handle))
    }

    /// Mutably borrow a stored value.
    pub fn get_mut<T: Any>(&mut self, handle: Handle) -> PoolResult<&mut T> {
        self.cell_mut(handle)?
            .payload
            .downcast_mut::<T>()
            .ok_or(PoolError::TypeMismatch(handle))
    }

    /// Borrow a byte buffer created by [`Pool::allocate`] or [`Pool::reallocate`].
    pub fn bytes(&self, handle: Handle) -> PoolResult<&[u8]> {
        self.get::<Vec<u8>>(handle).map(Vec::as_slice)
    }

    /// Borrow a string created by [`Pool::duplicate_string`].
    pub fn string(&self, handle: Handle) -> PoolResult<&str> {
        self.get::<String>(handle).map(String::as_str)
    }

    /// Whether `handle` refers to a live cell.
    pub fn contains(&self, handle: Handle) -> bool {
        self.cell(handle).is_ok()
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the pool holds no cells.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Bytes accounted to live cells.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    fn register(&mut self, payload: Payload, size: usize, reclaim: Reclaim) -> PoolResult<Handle> {
        self.charge(size)?;

        let cell = Cell {
            payload,
            size,
            reclaim,
        };

        let handle = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.cell = Some(cell);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| PoolError::OutOfMemory { requested: size })?;
                self.slots
                    .try_reserve(1)
                    .map_err(|_| PoolError::OutOfMemory { requested: size })?;
                self.slots.push(Slot {
                    generation: 0,
                    cell: Some(cell),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };

        self.live += 1;
        self.allocated += size;
        Ok(handle)
    }

    fn charge(&self, size: usize) -> PoolResult<()> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        match self.allocated.checked_add(size) {
            Some(total) if total <= limit => Ok(()),
            _ => Err(PoolError::OutOfMemory { requested: size }),
        }
    }

    fn cell(&self, handle: Handle) -> PoolResult<&Cell> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.cell.as_ref())
            .ok_or(PoolError::UnknownHandle(handle))
    }

    fn cell_mut(&mut self, handle: Handle) -> PoolResult<&mut Cell> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.cell.as_mut())
            .ok_or(PoolError::UnknownHandle(handle))
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("live", &self.live)
            .field("allocated", &self.allocated)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if self.live > 0 {
            tracing::trace!(cells = self.live, bytes = self.allocated, "reclaiming memory pool");
        }
        for slot in &mut self.slots {
            if let Some(cell) = slot.cell.take() {
                cell.reclaim.run(cell.payload);
            }
        }
    }
}

fn zeroed_buffer(size: usize) -> PoolResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| PoolError::OutOfMemory { requested: size })?;
    buffer.resize(size, 0);
    Ok(buffer)
}
