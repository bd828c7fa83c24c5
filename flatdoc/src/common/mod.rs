//! Shared building blocks: the [Value] type, constants, locking and sort helpers.

mod constants;
mod lock;
mod sort_order;
pub mod util;
mod value;

pub use constants::*;
pub use lock::*;
pub use sort_order::*;
pub use util::*;
pub use value::*;
