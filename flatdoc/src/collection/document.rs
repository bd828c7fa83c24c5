use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

type FieldVec = SmallVec<[String; 8]>;

/// Represents a record stored in a flatdoc collection.
///
/// A document is an open mapping of field name to [Value]. Fields keep the
/// order in which they were first written, and that order is what ends up in
/// the snapshot file. Equality, on the other hand, ignores field order: two
/// documents are equal when they carry the same fields with equal values.
///
/// Nested values are reachable with dotted paths through [Document::get_path].
/// A numeric path segment indexes into an array, so `"items.0.sku"` reads the
/// `sku` field of the first element of `items`.
///
/// ```rust
/// use flatdoc::doc;
/// use flatdoc::common::Value;
///
/// let doc = doc! {
///     name: "Alice",
///     address: { city: "New York" },
///     tags: ["a", "b"],
/// };
/// assert_eq!(doc.get_path("address.city"), Some(&Value::from("New York")));
/// assert_eq!(doc.get_path("tags.1"), Some(&Value::from("b")));
/// assert_eq!(doc.get_path("address.zip"), None);
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates the specified value with the key, keeping the key's
    /// original position when it already exists.
    ///
    /// The key is stored as-is; a dotted key is a single top-level field here.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidFieldName] if the key is empty.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> FlatdocResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(FlatdocError::new(
                "Document does not support empty key",
                ErrorKind::InvalidFieldName,
            ));
        }
        self.data.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Resolves a dotted field path.
    ///
    /// Returns `None` when any segment is absent, when a numeric segment is
    /// out of bounds, or when a segment descends into a scalar. An exact
    /// top-level key wins over path traversal.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(path) {
            return Some(value);
        }
        if !path.contains(FIELD_SEPARATOR) {
            return None;
        }

        let mut splits = path.split(FIELD_SEPARATOR);
        let first = splits.next()?;
        let mut current = self.data.get(first)?;
        for key in splits {
            current = match current {
                Value::Document(doc) => doc.data.get(key)?,
                Value::Array(arr) => {
                    let index = key.parse::<usize>().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replaces the value at an existing dotted path, returning whether the
    /// path resolved.
    pub fn replace_path(&mut self, path: &str, value: Value) -> bool {
        if self.data.contains_key(path) || !path.contains(FIELD_SEPARATOR) {
            return match self.data.get_mut(path) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            };
        }

        let splits: Vec<&str> = path.split(FIELD_SEPARATOR).collect();
        let mut current = match self.data.get_mut(splits[0]) {
            Some(v) => v,
            None => return false,
        };
        for key in &splits[1..] {
            let next = match current {
                Value::Document(doc) => doc.data.get_mut(*key),
                Value::Array(arr) => match key.parse::<usize>() {
                    Ok(index) => arr.get_mut(index),
                    Err(_) => None,
                },
                _ => None,
            };
            current = match next {
                Some(v) => v,
                None => return false,
            };
        }
        *current = value;
        true
    }

    /// Removes a top-level field, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the top-level field names in insertion order.
    pub fn fields(&self) -> FieldVec {
        self.data.keys().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Shallow-merges `other` into this document: every top-level field of
    /// `other` overwrites or extends this document.
    ///
    /// Returns `true` if any field actually changed.
    pub fn merge(&mut self, other: &Document) -> bool {
        let mut changed = false;
        for (key, value) in other.data.iter() {
            if self.data.get(key) != Some(value) {
                self.data.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .all(|(key, value)| other.data.get(key) == Some(value))
    }
}

impl Eq for Document {}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_entries().cmp(&other.sorted_entries())
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order-insensitive, consistent with PartialEq
        let mut sum: u64 = 0;
        for entry in self.data.iter() {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        self.data.len().hash(state);
        sum.hash(state);
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals. Values may be literals,
/// nested `{ ... }` documents, `[ ... ]` arrays, or any parenthesized
/// expression convertible into a [Value]; negative numbers need parentheses.
///
/// ```rust
/// use flatdoc::doc;
///
/// let empty = doc! {};
/// assert!(empty.is_empty());
///
/// let min_age = 18;
/// let doc = doc! {
///     "name": "Alice",
///     age: 25,
///     score: (-1),
///     limit: (min_age + 2),
///     address: { city: "New York" },
///     tags: ["a", "b"],
/// };
/// assert_eq!(doc.size(), 6);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Converts one `doc!` value token tree into a [Value].
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
