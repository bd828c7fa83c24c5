//! # flatdoc - embedded single-file document store
//!
//! flatdoc keeps named collections of JSON-like records in memory and
//! persists the whole store as one JSON file after every mutation.
//!
//! ## Key Features
//!
//! - **Mongo-style queries**: literal equality plus `$eq`, `$ne`, `$gt`,
//!   `$gte`, `$lt`, `$lte`, `$in`, `$nin` and `$regex`
//! - **Field indexes**: explicit, in-memory equality indexes rebuilt on demand
//! - **Aggregation**: `$match`, `$sort`, `$group`, `$limit`, `$skip`,
//!   `$project`, `$unwind`, `$lookup` and `$count` pipelines
//! - **Schemas**: per-collection validation through [schema::Model]
//! - **Pluggable persistence**: a JSON file, memory, or any
//!   [store::SnapshotStoreProvider]
//!
//! ## Quick Start
//!
//! ```rust
//! use flatdoc::{doc, Database};
//!
//! let db = Database::builder().in_memory().open().unwrap();
//! let users = db.collection("users").unwrap();
//!
//! users.insert(doc! { name: "Alice", age: 25, city: "New York" }).unwrap();
//! users.insert(doc! { name: "Bob", age: 30, city: "Los Angeles" }).unwrap();
//! users.insert(doc! { name: "Charlie", age: 22, city: "Chicago" }).unwrap();
//!
//! let found = users.find(&doc! { age: { "$gte": 25 } }).unwrap();
//! assert_eq!(found.len(), 2);
//!
//! let by_city = users
//!     .aggregate(&[doc! { "$group": { _id: "city", count: { "$sum": 1 } } }])
//!     .unwrap();
//! assert_eq!(by_city.len(), 3);
//!
//! let deleted = users.delete(&doc! { age: { "$lt": 25 } }).unwrap();
//! assert_eq!(deleted.deleted_count(), 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`aggregate`] - Pipeline stages and their execution
//! - [`collection`] - Documents, collections, results and field indexes
//! - [`common`] - Values, constants and shared utilities
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query parsing and evaluation
//! - [`schema`] - Schemas and schema-checked models
//! - [`store`] - The in-memory store and persistence gateways

pub mod aggregate;
pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod schema;
pub mod store;

mod database;
mod database_builder;
mod database_config;

pub use database::Database;
pub use database_builder::DatabaseBuilder;
pub use database_config::{DatabaseConfig, StorageTarget};
