use std::sync::Arc;

use crate::collection::{Collection, CollectionFactory};
use crate::database_builder::DatabaseBuilder;
use crate::database_config::DatabaseConfig;
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use crate::schema::{Model, Schema};
use crate::store::{DocumentStore, StoreSnapshot};

/// An open flatdoc database.
///
/// `Database` owns the in-memory store and the persistence gateway behind
/// it. It is cheap to clone; all clones share the same state.
///
/// ```rust
/// use flatdoc::{doc, Database};
///
/// let db = Database::builder().in_memory().open().unwrap();
/// let users = db.collection("users").unwrap();
/// users.insert(doc! { name: "Alice" }).unwrap();
///
/// assert!(db.has_collection("users"));
/// assert_eq!(db.snapshot().collection("users").map(|c| c.len()), Some(1));
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub(crate) fn open(config: DatabaseConfig) -> FlatdocResult<Database> {
        let gateway = config.initialize()?;
        let description = gateway.describe();
        let store = DocumentStore::open(gateway).map_err(|e| {
            log::error!("Failed to open database at {}: {}", description, e);
            FlatdocError::new_with_cause("Failed to open database", e.kind().clone(), e)
        })?;

        log::info!(
            "Opened database at {} with {} collection(s)",
            description,
            store.collection_names().len()
        );
        Ok(Database {
            inner: Arc::new(DatabaseInner {
                collection_factory: CollectionFactory::new(store.clone()),
                store,
                config,
            }),
        })
    }

    /// Returns the collection `name`, creating and flushing it when new.
    pub fn collection(&self, name: &str) -> FlatdocResult<Collection> {
        validate_collection_name(name)?;
        self.inner.collection_factory.get_collection(name)
    }

    /// Returns `name` wrapped in a [Model] that validates writes against `schema`.
    pub fn model(&self, name: &str, schema: Schema) -> FlatdocResult<Model> {
        let collection = self.collection(name)?;
        Ok(Model::new(collection, schema))
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.store.has_collection(name)
    }

    /// Collection names in creation order.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.store.collection_names()
    }

    /// Removes a collection with its records and indexes. Returns `false` if
    /// there was nothing to remove.
    pub fn drop_collection(&self, name: &str) -> FlatdocResult<bool> {
        self.inner.collection_factory.remove_collection(name);
        self.inner.store.drop_collection(name)
    }

    /// Writes the whole store through the gateway.
    pub fn flush(&self) -> FlatdocResult<()> {
        self.inner.store.flush()
    }

    /// Returns a detached copy of every collection.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.store.snapshot()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.inner.config)
            .field("collections", &self.collection_names())
            .finish()
    }
}

struct DatabaseInner {
    collection_factory: CollectionFactory,
    store: DocumentStore,
    config: DatabaseConfig,
}

fn validate_collection_name(name: &str) -> FlatdocResult<()> {
    if name.trim().is_empty() {
        log::error!("Collection name cannot be empty");
        return Err(FlatdocError::new(
            "Collection name cannot be empty",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}
