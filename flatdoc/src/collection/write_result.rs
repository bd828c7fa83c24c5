/// Counts reported by an update.
///
/// `matched_count` is the number of records the update addressed and
/// `modified_count` the number it changed. A collection-level update counts
/// every match as modified; an update through a find result counts only the
/// records whose content actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    matched_count: usize,
    modified_count: usize,
}

impl UpdateResult {
    pub fn new(matched_count: usize, modified_count: usize) -> Self {
        Self {
            matched_count,
            modified_count,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn modified_count(&self) -> usize {
        self.modified_count
    }
}

/// Counts reported by a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteResult {
    deleted_count: usize,
}

impl DeleteResult {
    pub fn new(deleted_count: usize) -> Self {
        Self { deleted_count }
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted_count
    }
}
