//! Schema validation for records.
//!
//! A [Schema] declares, per field, a [FieldType], whether the field is
//! required and an ordered list of [Constraint]s. A [Model] pairs a
//! collection with a schema so that inserts and update patches are checked
//! before anything is written.

mod field_type;
mod model;
#[allow(clippy::module_inception)]
mod schema;

pub use field_type::*;
pub use model::*;
pub use schema::*;
