use std::sync::Arc;

use crate::collection::{Collection, Document, RecordId, UpdateResult};
use crate::errors::FlatdocResult;
use crate::schema::Schema;

/// The records a find returned, plus a way to update exactly those records.
///
/// The result holds copies. [FindResult::update] writes through to the live
/// records the copies came from, even if the collection changed since the
/// find ran: records deleted in the meantime are no longer matched, records
/// inserted in the meantime are not touched.
///
/// A result obtained through a [Model](crate::schema::Model) validates the
/// patch against the model's schema before anything is written.
pub struct FindResult {
    collection: Collection,
    entries: Vec<(RecordId, Document)>,
    schema: Option<Arc<Schema>>,
}

impl FindResult {
    pub(crate) fn new(collection: Collection, entries: Vec<(RecordId, Document)>) -> Self {
        FindResult {
            collection,
            entries,
            schema: None,
        }
    }

    pub(crate) fn guarded_by(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&Document> {
        self.entries.first().map(|(_, doc)| doc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|(_, doc)| doc)
    }

    /// Returns copies of the found records.
    pub fn documents(&self) -> Vec<Document> {
        self.iter().cloned().collect()
    }

    /// Shallow-merges `patch` into every previously found record.
    ///
    /// `matched_count` counts the found records still present in the
    /// collection, `modified_count` those whose content changed. The store is
    /// flushed only when something changed. The copies held by this result
    /// are patched as well.
    pub fn update(&mut self, patch: &Document) -> FlatdocResult<UpdateResult> {
        if let Some(schema) = &self.schema {
            schema.validate_partial(patch)?;
        }
        let ids: Vec<RecordId> = self.entries.iter().map(|(id, _)| *id).collect();
        let result = self.collection.update_by_ids(&ids, patch)?;
        for (_, doc) in self.entries.iter_mut() {
            doc.merge(patch);
        }
        Ok(result)
    }
}

impl IntoIterator for FindResult {
    type Item = Document;
    type IntoIter = std::iter::Map<
        std::vec::IntoIter<(RecordId, Document)>,
        fn((RecordId, Document)) -> Document,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let take: fn((RecordId, Document)) -> Document = |(_, doc)| doc;
        self.entries.into_iter().map(take)
    }
}

impl std::fmt::Debug for FindResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
