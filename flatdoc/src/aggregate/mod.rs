//! Multi-stage aggregation over a collection's records.
//!
//! A pipeline is an ordered list of stages, written as single-key stage
//! descriptors or built from typed [Stage] values:
//!
//! | Stage | Behavior |
//! |---|---|
//! | `$match` | keeps records matching a query |
//! | `$sort` | stable multi-key sort; positive is ascending |
//! | `$group` | groups by a field, with `$sum`, `$avg`, `$min`, `$max`, `$count` |
//! | `$limit` / `$skip` | truncates or drops from the front, clamped to the input |
//! | `$project` | drops fields mapped to a falsy marker |
//! | `$unwind` | one record per element of an array field |
//! | `$lookup` | joins another collection into an array field |
//! | `$count` | one record holding the input size |
//!
//! Pipelines never mutate the collection they run over.

mod group;
mod pipeline;
mod stage;

pub use group::*;
pub use pipeline::*;
pub use stage::*;
