use std::cmp::Ordering;

use crate::aggregate::{LookupSpec, Stage};
use crate::collection::Document;
use crate::common::{SortOrder, Value};
use crate::errors::FlatdocResult;
use crate::store::{DocumentStore, StoreSnapshot};

/// Resolves the records of another collection for `$lookup`.
pub trait LookupSource {
    /// Returns copies of a collection's records, or `None` if it does not exist.
    fn lookup_records(&self, collection: &str) -> Option<Vec<Document>>;
}

impl LookupSource for DocumentStore {
    fn lookup_records(&self, collection: &str) -> Option<Vec<Document>> {
        self.records(collection)
    }
}

impl LookupSource for StoreSnapshot {
    fn lookup_records(&self, collection: &str) -> Option<Vec<Document>> {
        self.collection(collection).cloned()
    }
}

/// An ordered list of stages.
///
/// Each stage consumes the previous stage's output. Execution works on
/// detached copies; the source collection is never touched.
///
/// ```rust
/// use flatdoc::aggregate::Pipeline;
/// use flatdoc::doc;
/// use flatdoc::store::StoreSnapshot;
///
/// let pipeline = Pipeline::parse(&[
///     doc! { "$match": { age: { "$gte": 18 } } },
///     doc! { "$sort": { age: (-1) } },
///     doc! { "$limit": 1 },
/// ]).unwrap();
///
/// let records = vec![doc! { name: "Ann", age: 30 }, doc! { name: "Ben", age: 40 }];
/// let out = pipeline.execute(records, &StoreSnapshot::new());
/// assert_eq!(out, vec![doc! { name: "Ben", age: 40 }]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Pipeline { stages }
    }

    /// Parses stage descriptors; the first malformed stage fails the whole
    /// pipeline.
    pub fn parse(descriptors: &[Document]) -> FlatdocResult<Pipeline> {
        let stages = descriptors
            .iter()
            .map(Stage::parse)
            .collect::<FlatdocResult<Vec<_>>>()?;
        Ok(Pipeline { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn execute(&self, records: Vec<Document>, source: &dyn LookupSource) -> Vec<Document> {
        execute_stages(&self.stages, records, source)
    }
}

/// Threads `records` through `stages` in order.
pub fn execute_stages(
    stages: &[Stage],
    records: Vec<Document>,
    source: &dyn LookupSource,
) -> Vec<Document> {
    let mut results = records;
    for stage in stages {
        let input = results.len();
        results = apply_stage(stage, results, source);
        log::debug!("Stage {} took {} record(s), produced {}", stage.name(), input, results.len());
    }
    results
}

fn apply_stage(
    stage: &Stage,
    mut records: Vec<Document>,
    source: &dyn LookupSource,
) -> Vec<Document> {
    match stage {
        Stage::Match(query) => {
            records.retain(|doc| query.matches(doc));
            records
        }
        Stage::Sort(keys) => {
            records.sort_by(|a, b| compare_by_keys(a, b, keys));
            records
        }
        Stage::Group(spec) => spec.apply(records),
        Stage::Limit(n) => {
            let n = clamp(*n, records.len());
            records.truncate(n);
            records
        }
        Stage::Skip(n) => {
            let n = clamp(*n, records.len());
            records.split_off(n)
        }
        Stage::Project(markers) => {
            for doc in records.iter_mut() {
                for (field, keep) in markers {
                    if !keep {
                        doc.remove(field);
                    }
                }
            }
            records
        }
        Stage::Unwind(path) => unwind(records, path),
        Stage::Lookup(spec) => lookup(records, spec, source),
        Stage::Count(field) => {
            let mut out = Document::new();
            out.put(field, Value::from(records.len())).ok();
            vec![out]
        }
    }
}

#[inline]
fn clamp(n: i64, len: usize) -> usize {
    if n <= 0 {
        0
    } else {
        (n as u64).min(len as u64) as usize
    }
}

/// Missing fields sort after every present value in ascending order.
fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in keys {
        let ordering = match (a.get_path(field), b.get_path(field)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ordering = order.apply(ordering);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn unwind(records: Vec<Document>, path: &str) -> Vec<Document> {
    let mut out = Vec::with_capacity(records.len());
    for doc in records {
        let items = match doc.get_path(path) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => continue,
            // a scalar unwinds to itself
            Some(_) => {
                out.push(doc);
                continue;
            }
        };
        for item in items {
            let mut copy = doc.clone();
            copy.replace_path(path, item);
            out.push(copy);
        }
    }
    out
}

fn lookup(records: Vec<Document>, spec: &LookupSpec, source: &dyn LookupSource) -> Vec<Document> {
    let foreign = match source.lookup_records(&spec.from) {
        Some(foreign) => foreign,
        None => {
            log::warn!("$lookup from missing collection {}, joining nothing", spec.from);
            Vec::new()
        }
    };

    records
        .into_iter()
        .map(|mut doc| {
            let key = doc.get_path(&spec.foreign_field);
            let joined: Vec<Value> = foreign
                .iter()
                .filter(|other| other.get_path(&spec.local_field) == key)
                .cloned()
                .map(Value::Document)
                .collect();
            doc.put(&spec.as_field, Value::Array(joined)).ok();
            doc
        })
        .collect()
}
