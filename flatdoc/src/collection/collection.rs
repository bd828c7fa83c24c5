use dashmap::DashMap;
use std::sync::Arc;

use crate::aggregate::{execute_stages, Pipeline, Stage};
use crate::collection::{
    DeleteResult, Document, FieldIndex, FindResult, RecordId, StoredRecord, UpdateResult,
};
use crate::errors::FlatdocResult;
use crate::filter::Query;
use crate::store::DocumentStore;

/// A named, ordered sequence of records.
///
/// Collections are obtained from [Database::collection](crate::Database::collection)
/// and are cheap to clone; every clone, and every handle the database returns
/// for the same name, shares the same field indexes.
///
/// Every mutating call updates memory first and then flushes the whole store
/// before returning. Reads and aggregations work on copies and never flush.
///
/// ```rust
/// use flatdoc::{doc, Database};
///
/// let db = Database::builder().in_memory().open().unwrap();
/// let users = db.collection("users").unwrap();
/// users.insert(doc! { name: "Alice", age: 25 }).unwrap();
/// users.insert(doc! { name: "Bob", age: 30 }).unwrap();
///
/// let adults = users.find(&doc! { age: { "$gte": 26 } }).unwrap();
/// assert_eq!(adults.documents(), vec![doc! { name: "Bob", age: 30 }]);
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    pub(crate) fn new(name: &str, store: DocumentStore) -> Self {
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                store,
                indexes: DashMap::new(),
            }),
        }
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("size", &self.size())
            .finish()
    }
}

struct CollectionInner {
    name: String,
    store: DocumentStore,
    indexes: DashMap<String, FieldIndex>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn size(&self) -> usize {
        self.inner.store.read_records(&self.inner.name, |records| records.len())
    }

    /// Appends a record, keeping its field order, and flushes.
    ///
    /// No schema or uniqueness checks happen here; see [Model](crate::schema::Model).
    pub fn insert(&self, document: Document) -> FlatdocResult<Document> {
        self.inner.store.write_records(&self.inner.name, |records| {
            records.push(StoredRecord::new(document.clone()))
        });
        log::debug!("Inserted record into {}", self.inner.name);
        self.inner.store.flush()?;
        Ok(document)
    }

    /// Finds the records matching `query`, in insertion order.
    ///
    /// If an index exists for a field the query constrains by literal
    /// equality, the index bucket for that literal is returned as-is: other
    /// query fields are not checked and changes made since the index was
    /// built are not visible.
    pub fn find(&self, query: &Document) -> FlatdocResult<FindResult> {
        let query = Query::parse(query)?;
        Ok(self.find_compiled(&query))
    }

    pub fn find_all(&self) -> FindResult {
        self.find_compiled(&Query::all())
    }

    pub(crate) fn find_compiled(&self, query: &Query) -> FindResult {
        if !self.inner.indexes.is_empty() {
            for (field, value) in query.literal_fields() {
                if let Some(index) = self.inner.indexes.get(field) {
                    log::debug!(
                        "Answering {} on {} from the {} index",
                        query,
                        self.inner.name,
                        field
                    );
                    return FindResult::new(self.clone(), index.lookup(value));
                }
            }
        }

        let entries = self.inner.store.read_records(&self.inner.name, |records| {
            records
                .iter()
                .filter(|record| query.matches(record.document()))
                .map(|record| (record.id(), record.document().clone()))
                .collect()
        });
        FindResult::new(self.clone(), entries)
    }

    /// Shallow-merges `patch` into every record matching `query` and flushes
    /// once if anything matched.
    ///
    /// Every matched record counts as modified.
    pub fn update(&self, query: &Document, patch: &Document) -> FlatdocResult<UpdateResult> {
        let query = Query::parse(query)?;
        let matched = self.inner.store.write_records(&self.inner.name, |records| {
            let mut matched = 0;
            for record in records.iter_mut() {
                if query.matches(record.document()) {
                    record.document_mut().merge(patch);
                    matched += 1;
                }
            }
            matched
        });

        log::debug!("Updated {} record(s) in {}", matched, self.inner.name);
        if matched > 0 {
            self.inner.store.flush()?;
        }
        Ok(UpdateResult::new(matched, matched))
    }

    /// Merges `patch` into the live records with the given ids.
    pub(crate) fn update_by_ids(
        &self,
        ids: &[RecordId],
        patch: &Document,
    ) -> FlatdocResult<UpdateResult> {
        let (matched, modified) = self.inner.store.write_records(&self.inner.name, |records| {
            let mut matched = 0;
            let mut modified = 0;
            for record in records.iter_mut() {
                if ids.contains(&record.id()) {
                    matched += 1;
                    if record.document_mut().merge(patch) {
                        modified += 1;
                    }
                }
            }
            (matched, modified)
        });

        log::debug!("Updated {} of {} found record(s) in {}", modified, matched, self.inner.name);
        if modified > 0 {
            self.inner.store.flush()?;
        }
        Ok(UpdateResult::new(matched, modified))
    }

    /// Removes the records `query` selects and flushes if any were removed.
    ///
    /// Within one field's operator-mapping a record is selected as soon as
    /// one operator holds; fields still combine with AND. An empty query
    /// removes everything.
    pub fn delete(&self, query: &Document) -> FlatdocResult<DeleteResult> {
        let query = Query::parse(query)?;
        let deleted = self.inner.store.write_records(&self.inner.name, |records| {
            let before = records.len();
            records.retain(|record| !query.selects_for_delete(record.document()));
            before - records.len()
        });

        log::debug!("Deleted {} record(s) from {}", deleted, self.inner.name);
        if deleted > 0 {
            self.inner.store.flush()?;
        }
        Ok(DeleteResult::new(deleted))
    }

    /// Builds, or rebuilds, the equality index for `field` from the current
    /// records. Indexes live in memory only.
    pub fn create_index(&self, field: &str) {
        let index = self
            .inner
            .store
            .read_records(&self.inner.name, |records| FieldIndex::build(field, records));
        log::debug!(
            "Built index on {}.{} with {} distinct value(s)",
            self.inner.name,
            field,
            index.distinct_values()
        );
        self.inner.indexes.insert(field.to_string(), index);
    }

    pub fn drop_index(&self, field: &str) -> bool {
        self.inner.indexes.remove(field).is_some()
    }

    pub fn has_index(&self, field: &str) -> bool {
        self.inner.indexes.contains_key(field)
    }

    /// Runs a pipeline of stage descriptors over a copy of the records.
    pub fn aggregate(&self, pipeline: &[Document]) -> FlatdocResult<Vec<Document>> {
        let pipeline = Pipeline::parse(pipeline)?;
        Ok(self.aggregate_stages(pipeline.stages()))
    }

    /// Runs typed stages over a copy of the records.
    pub fn aggregate_stages(&self, stages: &[Stage]) -> Vec<Document> {
        let records = self.inner.store.records(&self.inner.name).unwrap_or_default();
        execute_stages(stages, records, &self.inner.store)
    }
}
