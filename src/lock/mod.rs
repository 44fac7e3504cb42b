//! Per-key locks serializing review upserts and cache counter updates.
//!
//! The store only guarantees atomicity per single-record write, so the
//! engine serializes find-or-create per `(reviewable, identity)` key and
//! cache read-modify-write per reviewable key. In-memory locks use
//! `Mutex` + `Condvar`; distributed deployments can swap in Redis,
//! Postgres advisory locks, etcd leases, etc.

mod error;
mod in_memory;

use std::sync::Arc;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};

/// A single lock instance.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Factory trait for obtaining per-key locks.
///
/// Repeated calls with the same key must return the same logical lock
/// (the same `Arc` for in-memory, or the same distributed key).
pub trait LockManager: Send + Sync {
    type Lock: Lock;

    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;
}

/// RAII guard: the key lock is held until the guard drops.
pub struct LockGuard<L: Lock> {
    lock: Arc<L>,
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        // If unlock fails here the primitive is already poisoned and every
        // later acquire will surface it.
        let _ = self.lock.unlock();
    }
}

/// Acquire the lock for `key`, blocking, and hold it for the guard's lifetime.
pub fn acquire<M: LockManager>(manager: &M, key: &str) -> Result<LockGuard<M::Lock>, LockError> {
    let lock = manager.get_lock(key)?;
    lock.lock()?;
    Ok(LockGuard { lock })
}
