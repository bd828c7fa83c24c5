use std::sync::Arc;

use super::Schema;
use crate::collection::{
    Collection, DeleteResult, Document, FindResult, UpdateOptions, UpdateResult,
};
use crate::errors::FlatdocResult;

/// A [Collection] guarded by a [Schema].
///
/// Writes are validated before they reach the collection; a failed check
/// leaves the collection untouched and nothing is flushed. Results of
/// [Model::find] carry the schema, so updating through them is checked too.
///
/// ```rust
/// use flatdoc::{doc, Database};
/// use flatdoc::schema::Schema;
///
/// let db = Database::builder().in_memory().open().unwrap();
/// let schema = Schema::from_document(&doc! {
///     name: { type: "string", required: true },
///     age: { type: "number", args: ["integer", 18] },
/// }).unwrap();
///
/// let users = db.model("users", schema).unwrap();
/// users.insert(doc! { name: "Alice", age: 25 }).unwrap();
/// assert!(users.insert(doc! { name: "Bob", age: 12 }).is_err());
/// assert_eq!(users.find_all().len(), 1);
/// ```
#[derive(Clone)]
pub struct Model {
    collection: Collection,
    schema: Arc<Schema>,
}

impl Model {
    pub(crate) fn new(collection: Collection, schema: Schema) -> Self {
        Model {
            collection,
            schema: Arc::new(schema),
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Checks a full record, required fields included.
    pub fn validate(&self, document: &Document) -> FlatdocResult<()> {
        self.schema.validate(document)
    }

    /// Checks an update patch; required fields are not enforced.
    pub fn validate_update(&self, patch: &Document) -> FlatdocResult<()> {
        self.schema.validate_partial(patch)
    }

    pub fn insert(&self, document: Document) -> FlatdocResult<Document> {
        self.validate(&document)?;
        self.collection.insert(document)
    }

    /// Updates with validation of the patch enabled.
    pub fn update(&self, query: &Document, patch: &Document) -> FlatdocResult<UpdateResult> {
        self.update_with_options(query, patch, &UpdateOptions::default())
    }

    pub fn update_with_options(
        &self,
        query: &Document,
        patch: &Document,
        options: &UpdateOptions,
    ) -> FlatdocResult<UpdateResult> {
        if options.is_run_validators() {
            self.validate_update(patch)?;
        }
        self.collection.update(query, patch)
    }

    /// Finds records; updating through the result validates the patch.
    pub fn find(&self, query: &Document) -> FlatdocResult<FindResult> {
        Ok(self.collection.find(query)?.guarded_by(self.schema.clone()))
    }

    pub fn find_all(&self) -> FindResult {
        self.collection.find_all().guarded_by(self.schema.clone())
    }

    pub fn delete(&self, query: &Document) -> FlatdocResult<DeleteResult> {
        self.collection.delete(query)
    }

    pub fn aggregate(&self, pipeline: &[Document]) -> FlatdocResult<Vec<Document>> {
        self.collection.aggregate(pipeline)
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("collection", &self.collection.name())
            .field("schema", &self.schema)
            .finish()
    }
}
