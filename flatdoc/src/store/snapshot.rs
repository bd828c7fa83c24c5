use indexmap::IndexMap;

use crate::collection::Document;

/// A detached copy of the whole store: collection name to its ordered records.
///
/// This is the unit the persistence gateway loads and saves. Serialized, it is
/// a single JSON object whose top-level fields are collection names, each
/// holding an array of records in insertion order:
///
/// ```text
/// {
///   "users": [
///     { "name": "Alice", "age": 25 }
///   ],
///   "orders": []
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct StoreSnapshot {
    collections: IndexMap<String, Vec<Document>>,
}

impl StoreSnapshot {
    pub fn new() -> Self {
        StoreSnapshot {
            collections: IndexMap::new(),
        }
    }

    pub fn collection(&self, name: &str) -> Option<&Vec<Document>> {
        self.collections.get(name)
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Sets the records of a collection, replacing any previous content.
    pub fn insert(&mut self, name: &str, records: Vec<Document>) {
        self.collections.insert(name.to_string(), records);
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<Document>> {
        self.collections.iter()
    }
}

impl IntoIterator for StoreSnapshot {
    type Item = (String, Vec<Document>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<Document>>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.into_iter()
    }
}
