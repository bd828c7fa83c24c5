use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use crate::store::{SnapshotStoreProvider, StoreSnapshot};

/// Keeps the last saved snapshot in memory.
///
/// Used for scratch databases and tests. Clones share the same content, so a
/// test can keep a handle and inspect what the database saved. Saves can be
/// made to fail on demand with [InMemorySnapshotStore::fail_saves].
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    inner: Arc<InMemorySnapshotStoreInner>,
}

#[derive(Default)]
struct InMemorySnapshotStoreInner {
    snapshot: Atomic<Option<StoreSnapshot>>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        InMemorySnapshotStore::default()
    }

    /// Creates a store that loads `snapshot` on open.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        InMemorySnapshotStore {
            inner: Arc::new(InMemorySnapshotStoreInner {
                snapshot: atomic(Some(snapshot)),
                ..Default::default()
            }),
        }
    }

    /// Returns the last saved snapshot.
    pub fn saved(&self) -> Option<StoreSnapshot> {
        self.inner.snapshot.read_with(|s| s.clone())
    }

    pub fn save_count(&self) -> usize {
        self.inner.save_count.load(Ordering::Relaxed)
    }

    /// Makes every following save fail with an IO error until reset.
    pub fn fail_saves(&self, fail: bool) {
        self.inner.fail_saves.store(fail, Ordering::Relaxed);
    }
}

impl SnapshotStoreProvider for InMemorySnapshotStore {
    fn load(&self) -> FlatdocResult<Option<StoreSnapshot>> {
        Ok(self.saved())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> FlatdocResult<()> {
        if self.inner.fail_saves.load(Ordering::Relaxed) {
            log::error!("In-memory snapshot store rejected save");
            return Err(FlatdocError::new(
                "In-memory snapshot store rejected save",
                ErrorKind::IOError,
            ));
        }
        self.inner
            .snapshot
            .write_with(|s| *s = Some(snapshot.clone()));
        self.inner.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
