//! Query expressions and their evaluation against records.
//!
//! A query is itself a [Document](crate::collection::Document): each field
//! maps either to a literal value, matched by structural equality, or to an
//! operator-mapping whose operators are tested against the field value.
//!
//! ```rust
//! use flatdoc::doc;
//! use flatdoc::filter::Query;
//!
//! let query = Query::parse(&doc! {
//!     age: { "$gte": 18, "$lt": 65 },
//!     city: { "$in": ["Boston", "Chicago"] },
//!     name: { "$regex": "^A" },
//! }).unwrap();
//! assert!(query.matches(&doc! { name: "Ann", age: 30, city: "Boston" }));
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `$eq`, `$ne`
//! - **Comparison**: `$gt`, `$gte`, `$lt`, `$lte`
//! - **Membership**: `$in`, `$nin`
//! - **Pattern**: `$regex` (tested against the field value coerced to text)

mod operator;
mod query;

pub use operator::*;
pub use query::*;
