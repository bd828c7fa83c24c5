use std::cmp::Ordering;

use crate::common::Value;

/// Specifies the direction of one `$sort` key.
///
/// A `$sort` stage maps each field to a direction marker; a strictly positive
/// number means ascending and anything else means descending:
///
/// ```text
/// { "$sort": { "age": -1, "name": 1 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest to largest (A-Z, 0-9)
    Ascending,
    /// Largest to smallest (Z-A, 9-0)
    Descending,
}

impl SortOrder {
    /// Resolves a direction marker from a `$sort` specification.
    pub fn from_direction(direction: &Value) -> SortOrder {
        match direction.as_f64() {
            Some(d) if d > 0.0 => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    /// Orients an ascending comparison result for this direction.
    #[inline]
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl From<SortOrder> for Value {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => Value::I64(1),
            SortOrder::Descending => Value::I64(-1),
        }
    }
}
