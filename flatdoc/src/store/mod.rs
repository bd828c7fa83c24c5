//! Persistence for the whole store.
//!
//! flatdoc keeps every collection in memory and persists by rewriting one
//! snapshot of the entire store after each mutation. The durable side is a
//! [SnapshotStoreProvider]:
//!
//! - [FileSnapshotStore] writes a single JSON file.
//! - [InMemorySnapshotStore] keeps the snapshot in memory, for tests and
//!   scratch databases.
//!
//! [DocumentStore] owns the in-memory state and drives the provider.

mod document_store;
mod file_store;
mod memory_store;
mod snapshot;
mod snapshot_store;

pub use document_store::*;
pub use file_store::*;
pub use memory_store::*;
pub use snapshot::*;
pub use snapshot_store::*;
