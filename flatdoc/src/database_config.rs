//! Configuration for opening a flatdoc database.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use crate::store::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};

/// Where the durable snapshot lives.
#[derive(Debug, Clone)]
pub enum StorageTarget {
    /// A JSON file at the given path.
    File(PathBuf),
    /// Nothing durable; snapshots are kept in memory.
    InMemory,
    /// A caller supplied gateway.
    Custom(SnapshotStore),
}

/// Resolved settings of a database.
///
/// Settings are written by [DatabaseBuilder](crate::DatabaseBuilder) and
/// become read-only once the database is open.
#[derive(Clone)]
pub struct DatabaseConfig {
    inner: Arc<DatabaseConfigInner>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        DatabaseConfig {
            inner: Arc::new(DatabaseConfigInner {
                configured: AtomicBool::new(false),
                target: atomic(None),
                pretty_print: atomic(true),
            }),
        }
    }

    /// Returns the configured storage target, if any.
    pub fn target(&self) -> Option<StorageTarget> {
        self.inner.target.read_with(|it| it.clone())
    }

    /// Returns the file path when the database is file-backed.
    pub fn file_path(&self) -> Option<PathBuf> {
        match self.target() {
            Some(StorageTarget::File(path)) => Some(path),
            _ => None,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.target(), Some(StorageTarget::InMemory))
    }

    pub fn is_pretty_print(&self) -> bool {
        self.inner.pretty_print.read_with(|it| *it)
    }

    pub fn set_file_path<P: AsRef<Path>>(&self, path: P) -> FlatdocResult<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            log::error!("Database file path cannot be empty");
            return Err(FlatdocError::new(
                "Database file path cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }
        self.inner.set_target(StorageTarget::File(path.to_path_buf()))
    }

    pub fn set_in_memory(&self) -> FlatdocResult<()> {
        self.inner.set_target(StorageTarget::InMemory)
    }

    pub fn set_snapshot_store(&self, store: SnapshotStore) -> FlatdocResult<()> {
        self.inner.set_target(StorageTarget::Custom(store))
    }

    pub fn set_pretty_print(&self, pretty_print: bool) -> FlatdocResult<()> {
        self.inner.check_not_configured("Pretty print")?;
        self.inner.pretty_print.write_with(|it| *it = pretty_print);
        Ok(())
    }

    /// Builds the gateway for the configured target and freezes the settings.
    pub(crate) fn initialize(&self) -> FlatdocResult<SnapshotStore> {
        let gateway = match self.target() {
            Some(StorageTarget::File(path)) => {
                SnapshotStore::new(FileSnapshotStore::new(path, self.is_pretty_print()))
            }
            Some(StorageTarget::InMemory) => SnapshotStore::new(InMemorySnapshotStore::new()),
            Some(StorageTarget::Custom(store)) => store,
            None => {
                log::error!("No storage target is configured");
                return Err(FlatdocError::new(
                    "No storage target is configured; use file_path, in_memory or snapshot_store",
                    ErrorKind::InvalidOperation,
                ));
            }
        };
        self.inner.configured.store(true, Ordering::Relaxed);
        Ok(gateway)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("target", &self.target())
            .field("pretty_print", &self.is_pretty_print())
            .finish()
    }
}

struct DatabaseConfigInner {
    configured: AtomicBool,
    target: Atomic<Option<StorageTarget>>,
    pretty_print: Atomic<bool>,
}

impl DatabaseConfigInner {
    fn check_not_configured(&self, setting: &str) -> FlatdocResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the database is open", setting);
            return Err(FlatdocError::new(
                &format!("{} cannot be changed after the database is open", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_target(&self, target: StorageTarget) -> FlatdocResult<()> {
        self.check_not_configured("Storage target")?;
        if let Some(existing) = self.target.read_with(|it| it.clone()) {
            log::error!("Storage target already set to {:?}", existing);
            return Err(FlatdocError::new(
                "Only one of file_path, in_memory or snapshot_store can be set",
                ErrorKind::InvalidOperation,
            ));
        }
        self.target.write_with(|it| *it = Some(target));
        Ok(())
    }
}
