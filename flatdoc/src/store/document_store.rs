use indexmap::IndexMap;
use std::sync::Arc;

use crate::collection::{Document, StoredRecord};
use crate::common::{atomic, Atomic, LockHandle, ReadExecutor, WriteExecutor};
use crate::errors::{FlatdocError, FlatdocResult};
use crate::store::{SnapshotStore, StoreSnapshot};

type StoreData = IndexMap<String, Vec<StoredRecord>>;

/// The single owned state of an open database.
///
/// Holds every collection's records in memory and writes the whole store
/// through the [SnapshotStore] on [DocumentStore::flush]. Mutations take the
/// data lock only for the in-memory change; the flush step is serialized by a
/// separate write lock and reads a consistent copy of the data.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<DocumentStoreInner>,
}

struct DocumentStoreInner {
    data: Atomic<StoreData>,
    gateway: SnapshotStore,
    write_lock: LockHandle,
}

impl DocumentStore {
    /// Loads the store through `gateway`.
    ///
    /// When the gateway has nothing saved yet, the store starts empty and the
    /// empty snapshot is saved immediately.
    pub fn open(gateway: SnapshotStore) -> FlatdocResult<DocumentStore> {
        let loaded = gateway.load().map_err(|e| {
            log::error!("Failed to load store from {}: {}", gateway.describe(), e);
            e
        })?;

        let store = DocumentStore {
            inner: Arc::new(DocumentStoreInner {
                data: atomic(IndexMap::new()),
                gateway,
                write_lock: LockHandle::new("write"),
            }),
        };

        match loaded {
            Some(snapshot) => {
                let data: StoreData = snapshot
                    .into_iter()
                    .map(|(name, docs)| (name, docs.into_iter().map(StoredRecord::new).collect()))
                    .collect();
                log::info!(
                    "Loaded {} collection(s) from {}",
                    data.len(),
                    store.inner.gateway.describe()
                );
                store.inner.data.write_with(|it| *it = data);
            }
            None => {
                log::info!(
                    "No snapshot at {}, initializing an empty store",
                    store.inner.gateway.describe()
                );
                store.flush()?;
            }
        }
        Ok(store)
    }

    pub fn gateway(&self) -> &SnapshotStore {
        &self.inner.gateway
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.data.read_with(|data| data.contains_key(name))
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.inner.data.read_with(|data| data.keys().cloned().collect())
    }

    /// Creates an empty collection if it does not exist yet and flushes.
    ///
    /// Returns `true` if the collection was created.
    pub fn ensure_collection(&self, name: &str) -> FlatdocResult<bool> {
        let created = self.inner.data.write_with(|data| {
            if data.contains_key(name) {
                false
            } else {
                data.insert(name.to_string(), Vec::new());
                true
            }
        });

        if created {
            log::debug!("Created collection {}", name);
            self.flush()?;
        }
        Ok(created)
    }

    /// Removes a collection and its records, flushing if it existed.
    pub fn drop_collection(&self, name: &str) -> FlatdocResult<bool> {
        let removed = self
            .inner
            .data
            .write_with(|data| data.shift_remove(name).is_some());

        if removed {
            log::debug!("Dropped collection {}", name);
            self.flush()?;
        }
        Ok(removed)
    }

    /// Runs `f` over the records of a collection; a missing collection reads
    /// as empty.
    pub(crate) fn read_records<R>(&self, name: &str, f: impl FnOnce(&[StoredRecord]) -> R) -> R {
        self.inner.data.read_with(|data| match data.get(name) {
            Some(records) => f(records),
            None => f(&[]),
        })
    }

    /// Runs `f` over the mutable records of a collection, creating the
    /// collection when it is missing.
    pub(crate) fn write_records<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Vec<StoredRecord>) -> R,
    ) -> R {
        self.inner
            .data
            .write_with(|data| f(data.entry(name.to_string()).or_default()))
    }

    /// Returns detached copies of a collection's records.
    pub fn records(&self, name: &str) -> Option<Vec<Document>> {
        self.inner.data.read_with(|data| {
            data.get(name)
                .map(|records| records.iter().map(|r| r.document().clone()).collect())
        })
    }

    /// Returns a detached copy of the whole store.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.data.read_with(|data| {
            let mut snapshot = StoreSnapshot::new();
            for (name, records) in data.iter() {
                snapshot.insert(name, records.iter().map(|r| r.document().clone()).collect());
            }
            snapshot
        })
    }

    /// Writes the whole store through the gateway.
    ///
    /// On failure the in-memory state is kept as-is, so memory and the durable
    /// copy differ until the next successful flush.
    pub fn flush(&self) -> FlatdocResult<()> {
        let _guard = self.inner.write_lock.acquire();
        let snapshot = self.snapshot();

        match self.inner.gateway.save(&snapshot) {
            Ok(()) => {
                log::debug!(
                    "Flushed {} collection(s) to {}",
                    snapshot.len(),
                    self.inner.gateway.describe()
                );
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "Failed to flush store to {}: {}",
                    self.inner.gateway.describe(),
                    e
                );
                Err(FlatdocError::new_with_cause(
                    "Failed to flush store",
                    e.kind().clone(),
                    e,
                ))
            }
        }
    }
}
