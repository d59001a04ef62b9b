//! Contract tests verifying the memory_manager API.
//! These tests pin the observable behavior other components rely on.

use memory_manager::{grow_capacity, GrowVec, Interner, Pool, PoolError, Reclaim};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test Pool contract: allocate(size, reclaim) -> Handle
#[test]
fn contract_pool_allocate() {
    let mut pool = Pool::new();
    let handle = pool.allocate(64, Reclaim::Drop).unwrap();
    assert!(pool.contains(handle));
    assert_eq!(pool.bytes(handle).unwrap().len(), 64);
}

/// Test Pool contract: free succeeds exactly once
#[test]
fn contract_pool_double_free_detected() {
    let mut pool = Pool::new();
    let handle = pool.allocate(8, Reclaim::Drop).unwrap();

    assert!(pool.free(handle).is_ok());
    assert_eq!(pool.free(handle), Err(PoolError::UnknownHandle(handle)));
}

/// Test Pool contract: handles from one pool are unknown to another
#[test]
fn contract_pool_foreign_handle_rejected() {
    let mut owner = Pool::new();
    let mut other = Pool::new();
    let handle = owner.duplicate_string("foreign").unwrap();

    assert!(matches!(other.free(handle), Err(PoolError::UnknownHandle(_))));
    assert!(matches!(
        other.reallocate(Some(handle), 4),
        Err(PoolError::UnknownHandle(_))
    ));
}

/// Test Pool contract: reallocate(None, n) behaves as allocate
#[test]
fn contract_pool_reallocate_null() {
    let mut pool = Pool::new();
    let handle = pool.reallocate(None, 12).unwrap();
    assert_eq!(pool.bytes(handle).unwrap().len(), 12);
}

/// Test Pool contract: teardown runs every outstanding reclaim function
#[test]
fn contract_pool_teardown_reclaims() {
    let reclaimed = Arc::new(AtomicUsize::new(0));
    let mut pool = Pool::new();
    for i in 0..4 {
        let counter = Arc::clone(&reclaimed);
        pool.insert_with(i, Reclaim::with(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    }
    drop(pool);
    assert_eq!(reclaimed.load(Ordering::SeqCst), 4);
}

/// Test grow_capacity contract: strictly increasing, never overflowing
#[test]
fn contract_grow_capacity_monotonic() {
    let mut capacity = 0usize;
    for _ in 0..64 {
        match grow_capacity(capacity, capacity + 1, usize::MAX) {
            Ok(next) => {
                assert!(next > capacity);
                capacity = next;
            }
            Err(e) => {
                assert!(matches!(e, PoolError::CapacityOverflow { .. }));
                break;
            }
        }
    }
}

/// Test GrowVec contract: oversized request is a diagnostic, not a crash
#[test]
fn contract_growvec_oversized_request() {
    let mut v: GrowVec<u64> = GrowVec::with_limit(16);
    assert!(matches!(
        v.reserve(17),
        Err(PoolError::CapacityOverflow { requested: 17, limit: 16 })
    ));
    assert!(matches!(
        v.reserve(usize::MAX),
        Err(PoolError::CapacityOverflow { .. })
    ));
}

/// Test Interner contract: intern/resolve are inverse
#[test]
fn contract_interner_roundtrip() {
    let mut pool = Pool::new();
    let mut table = Interner::new();
    let id = table.intern(&mut pool, "/etc/sieve/global.sieve").unwrap();
    assert_eq!(table.resolve(&pool, id).unwrap(), "/etc/sieve/global.sieve");
    assert!(matches!(
        table.resolve(&pool, 99),
        Err(PoolError::UnknownIdentifier(99))
    ));
}
