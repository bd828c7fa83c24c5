use std::ops::Deref;
use std::sync::Arc;

use crate::errors::FlatdocResult;
use crate::store::StoreSnapshot;

/// The durable side of the store.
///
/// A provider loads and saves the entire store as one [StoreSnapshot]; there
/// are no incremental writes. Implementations must be thread-safe, although
/// flatdoc never calls `save` concurrently.
pub trait SnapshotStoreProvider: Send + Sync {
    /// Loads the last saved snapshot, or `None` if nothing was ever saved.
    fn load(&self) -> FlatdocResult<Option<StoreSnapshot>>;

    /// Replaces the durable content with `snapshot`.
    fn save(&self, snapshot: &StoreSnapshot) -> FlatdocResult<()>;

    /// A short human readable description used in log messages.
    fn describe(&self) -> String;
}

/// A cloneable handle to a [SnapshotStoreProvider].
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<dyn SnapshotStoreProvider>,
}

impl SnapshotStore {
    pub fn new<T: SnapshotStoreProvider + 'static>(inner: T) -> Self {
        SnapshotStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for SnapshotStore {
    type Target = Arc<dyn SnapshotStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SnapshotStore({})", self.inner.describe())
    }
}
