use std::path::Path;

use crate::database::Database;
use crate::database_config::DatabaseConfig;
use crate::errors::{FlatdocError, FlatdocResult};
use crate::store::SnapshotStore;

/// Fluent configuration for opening a [Database].
///
/// Exactly one storage target must be chosen. Configuration errors are held
/// back and returned from [DatabaseBuilder::open].
///
/// ```rust
/// use flatdoc::Database;
///
/// let db = Database::builder().in_memory().open().unwrap();
/// assert!(db.collection_names().is_empty());
///
/// let err = Database::builder().in_memory().file_path("db.json").open();
/// assert!(err.is_err());
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    error: Option<FlatdocError>,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: DatabaseConfig::new(),
        }
    }

    /// Persists the store as a JSON file at `path`. The file is created on
    /// open if it does not exist; its parent directory must exist.
    pub fn file_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_file_path(path) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Keeps snapshots in memory only.
    pub fn in_memory(mut self) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_in_memory() {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses a caller supplied persistence gateway.
    pub fn snapshot_store(mut self, store: SnapshotStore) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_snapshot_store(store) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Whether the snapshot file is indented. Defaults to `true`.
    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_pretty_print(pretty_print) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the database, loading the existing snapshot or saving an empty one.
    pub fn open(self) -> FlatdocResult<Database> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Database::open(self.config)
    }
}
