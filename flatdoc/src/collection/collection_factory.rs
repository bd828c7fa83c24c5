use super::Collection;
use crate::errors::FlatdocResult;
use crate::store::DocumentStore;
use dashmap::DashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Hands out one shared [Collection] handle per name, so field indexes built
/// through one handle are seen by all of them.
#[derive(Clone)]
pub(crate) struct CollectionFactory {
    inner: Arc<CollectionFactoryInner>,
}

impl CollectionFactory {
    pub fn new(store: DocumentStore) -> Self {
        CollectionFactory {
            inner: Arc::new(CollectionFactoryInner {
                collections: DashMap::new(),
                store,
            }),
        }
    }
}

impl Deref for CollectionFactory {
    type Target = Arc<CollectionFactoryInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub(crate) struct CollectionFactoryInner {
    collections: DashMap<String, Collection>,
    store: DocumentStore,
}

impl CollectionFactoryInner {
    /// Returns the handle for `name`, creating the collection (and flushing)
    /// when the store does not have it yet.
    pub fn get_collection(&self, name: &str) -> FlatdocResult<Collection> {
        self.store.ensure_collection(name)?;

        let collection = self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name, self.store.clone()))
            .clone();
        Ok(collection)
    }

    /// Forgets the cached handle, together with its indexes.
    pub fn remove_collection(&self, name: &str) {
        self.collections.remove(name);
    }
}
