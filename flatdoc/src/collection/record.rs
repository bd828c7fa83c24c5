use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::collection::Document;

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local identity of a stored record.
///
/// Record ids are never persisted. They let a find result or a field index
/// refer back to the live record it was copied from, the way an object
/// reference would, without sharing the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub(crate) fn next() -> RecordId {
        RecordId(NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A record as held by a collection.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    id: RecordId,
    document: Document,
}

impl StoredRecord {
    pub(crate) fn new(document: Document) -> Self {
        StoredRecord {
            id: RecordId::next(),
            document,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}
