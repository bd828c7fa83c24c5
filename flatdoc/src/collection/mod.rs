//! Records and collections.
//!
//! A [Document] is an ordered mapping of field name to
//! [Value](crate::common::Value); nested fields are addressed with dotted
//! paths such as `"address.city"`.
//!
//! ```rust
//! use flatdoc::doc;
//!
//! let mut doc = doc! { name: "Alice", address: { city: "New York" } };
//! doc.put("age", 25).unwrap();
//! ```
//!
//! A [Collection] stores documents in insertion order and supports
//! insert, find, update and delete, explicitly built field indexes and
//! aggregation pipelines. Each mutation flushes the whole store.
//!
//! ```rust
//! use flatdoc::{doc, Database};
//!
//! let db = Database::builder().in_memory().open().unwrap();
//! let users = db.collection("users").unwrap();
//! users.insert(doc! { name: "Alice", age: 25 }).unwrap();
//!
//! let result = users.update(&doc! { name: "Alice" }, &doc! { age: 26 }).unwrap();
//! assert_eq!(result.matched_count(), 1);
//!
//! let result = users.delete(&doc! { age: { "$gt": 20 } }).unwrap();
//! assert_eq!(result.deleted_count(), 1);
//! ```

#[allow(clippy::module_inception)]
mod collection;
mod collection_factory;
mod document;
mod field_index;
mod find_result;
mod record;
mod update_options;
mod write_result;

pub use collection::*;
pub(crate) use collection_factory::*;
pub use document::*;
pub use field_index::*;
pub use find_result::*;
pub use record::*;
pub use update_options::*;
pub use write_result::*;
