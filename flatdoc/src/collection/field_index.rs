use indexmap::IndexMap;

use crate::collection::{Document, RecordId, StoredRecord};
use crate::common::Value;

/// An explicitly built equality cache over one field.
///
/// Building groups the collection's current records by the value at the
/// field path. Each bucket holds copies of the records, tagged with the id of
/// the live record they came from. The index is never maintained: inserts,
/// updates and deletes after the build are invisible to it until it is
/// rebuilt. Records without the field are not indexed.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    field: String,
    buckets: IndexMap<Value, Vec<(RecordId, Document)>>,
}

impl FieldIndex {
    pub(crate) fn build(field: &str, records: &[StoredRecord]) -> FieldIndex {
        let mut buckets: IndexMap<Value, Vec<(RecordId, Document)>> = IndexMap::new();
        for record in records {
            if let Some(value) = record.document().get_path(field) {
                buckets
                    .entry(value.clone())
                    .or_default()
                    .push((record.id(), record.document().clone()));
            }
        }

        FieldIndex {
            field: field.to_string(),
            buckets,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the bucket for `value`, or an empty list.
    pub fn lookup(&self, value: &Value) -> Vec<(RecordId, Document)> {
        self.buckets.get(value).cloned().unwrap_or_default()
    }

    /// Number of distinct indexed values.
    pub fn distinct_values(&self) -> usize {
        self.buckets.len()
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
