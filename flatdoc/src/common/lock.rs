use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A named, process-wide exclusive lock.
///
/// The store holds one of these around every snapshot flush so two callers
/// can never interleave whole-snapshot writes. Clones share the same lock.
///
/// # Examples
///
/// ```
/// use flatdoc::common::LockHandle;
///
/// let lock = LockHandle::new("write");
/// {
///     let _guard = lock.acquire();
///     assert!(lock.is_locked());
/// }
/// assert!(!lock.is_locked());
/// ```
#[derive(Clone)]
pub struct LockHandle {
    name: Arc<str>,
    lock: Arc<Mutex<()>>,
}

impl LockHandle {
    /// Creates a new lock with the given name.
    pub fn new(name: &str) -> Self {
        LockHandle {
            name: Arc::from(name),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Blocks until the lock is free and returns its guard.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Returns the guard if the lock is currently free.
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.lock.try_lock()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandle")
            .field("name", &self.name)
            .field("locked", &self.is_locked())
            .finish()
    }
}
