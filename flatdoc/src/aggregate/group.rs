use indexmap::IndexMap;

use crate::collection::Document;
use crate::common::{Value, DOC_ID, STAGE_PREFIX};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};

/// Strips a leading `$` from a Mongo-style field reference.
pub(crate) fn field_reference(name: &str) -> &str {
    name.strip_prefix(STAGE_PREFIX).unwrap_or(name)
}

/// What a `$sum` accumulator adds up.
#[derive(Debug, Clone, PartialEq)]
pub enum SumOperand {
    /// A numeric literal contributed once per record; `1` counts the group.
    Constant(Value),
    /// The numeric values of a field.
    Field(String),
}

/// A group accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    Sum(SumOperand),
    Avg(String),
    /// The whole record holding the smallest value of the field.
    Min(String),
    /// The whole record holding the largest value of the field.
    Max(String),
    Count,
}

impl Accumulator {
    /// Parses `{ "$op": arg }`.
    fn parse(output: &str, spec: &Value) -> FlatdocResult<Accumulator> {
        let (op, arg) = match spec.as_document().filter(|doc| doc.size() == 1) {
            Some(doc) => match doc.iter().next() {
                Some((op, arg)) => (op.clone(), arg.clone()),
                None => return Err(Self::not_single(output, spec)),
            },
            None => return Err(Self::not_single(output, spec)),
        };

        let accumulator = match op.as_str() {
            "$sum" => match &arg {
                Value::String(field) => {
                    Accumulator::Sum(SumOperand::Field(field_reference(field).to_string()))
                }
                value if value.is_number() => Accumulator::Sum(SumOperand::Constant(value.clone())),
                _ => return Err(Self::bad_argument(&op, &arg)),
            },
            "$avg" => Accumulator::Avg(Self::field_argument(&op, &arg)?),
            "$min" => Accumulator::Min(Self::field_argument(&op, &arg)?),
            "$max" => Accumulator::Max(Self::field_argument(&op, &arg)?),
            "$count" => Accumulator::Count,
            _ => {
                log::error!("Unsupported accumulator operator: {}", op);
                return Err(FlatdocError::new(
                    &format!("Unsupported accumulator operator: {}", op),
                    ErrorKind::UnsupportedOperator,
                ));
            }
        };
        Ok(accumulator)
    }

    fn not_single(output: &str, spec: &Value) -> FlatdocError {
        log::error!(
            "Accumulator for {} must be a single-operator document, found {}",
            output,
            spec
        );
        FlatdocError::new(
            &format!("Accumulator for {} must be a single-operator document", output),
            ErrorKind::InvalidOperation,
        )
    }

    fn field_argument(op: &str, arg: &Value) -> FlatdocResult<String> {
        match arg.as_str() {
            Some(field) => Ok(field_reference(field).to_string()),
            None => Err(Self::bad_argument(op, arg)),
        }
    }

    fn bad_argument(op: &str, arg: &Value) -> FlatdocError {
        log::error!("Invalid argument for {}: {}", op, arg);
        FlatdocError::new(
            &format!("Invalid argument for {}: {}", op, arg),
            ErrorKind::InvalidOperation,
        )
    }

    fn apply(&self, group: &[Document]) -> Value {
        match self {
            Accumulator::Sum(SumOperand::Constant(n)) => match n {
                Value::I64(n) => Value::I64(n.saturating_mul(group.len() as i64)),
                other => Value::F64(other.as_f64().unwrap_or(0.0) * group.len() as f64),
            },
            Accumulator::Sum(SumOperand::Field(field)) => sum(numbers(group, field)),
            Accumulator::Avg(field) => {
                let values: Vec<&Value> = numbers(group, field).collect();
                if values.is_empty() {
                    Value::Null
                } else {
                    let total: f64 = values.iter().filter_map(|v| v.as_f64()).sum();
                    Value::F64(total / values.len() as f64)
                }
            }
            Accumulator::Min(field) => extremal(group, field, |candidate, best| candidate < best),
            Accumulator::Max(field) => extremal(group, field, |candidate, best| candidate > best),
            Accumulator::Count => Value::from(group.len()),
        }
    }
}

fn numbers<'a>(group: &'a [Document], field: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    group
        .iter()
        .filter_map(move |doc| doc.get_path(field))
        .filter(|v| v.is_number())
}

/// Integer sum while every addend is an integer, float sum otherwise.
fn sum<'a>(values: impl Iterator<Item = &'a Value>) -> Value {
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;
    for value in values {
        if let Value::I64(v) = value {
            int_total = int_total.and_then(|t| t.checked_add(*v));
        } else {
            int_total = None;
        }
        float_total += value.as_f64().unwrap_or(0.0);
    }
    match int_total {
        Some(total) => Value::I64(total),
        None => Value::F64(float_total),
    }
}

/// Returns the first record whose field value wins against every other;
/// records without the field, or with null, are skipped.
fn extremal(group: &[Document], field: &str, wins: impl Fn(&Value, &Value) -> bool) -> Value {
    let mut best: Option<(&Value, &Document)> = None;
    for doc in group {
        let value = match doc.get_path(field) {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        best = match best {
            Some((current, _)) if !wins(value, current) => best,
            _ => Some((value, doc)),
        };
    }
    best.map(|(_, doc)| Value::Document(doc.clone()))
        .unwrap_or(Value::Null)
}

/// The parameters of a `$group` stage.
///
/// ```text
/// { "$group": { "_id": "city", "count": { "$sum": 1 }, "oldest": { "$max": "age" } } }
/// ```
///
/// `_id` names the grouping field; `null` puts every record in one group.
/// Groups are emitted in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    key: Option<String>,
    accumulators: Vec<(String, Accumulator)>,
}

impl GroupSpec {
    pub fn new(key: Option<&str>) -> Self {
        GroupSpec {
            key: key.map(|k| field_reference(k).to_string()),
            accumulators: Vec::new(),
        }
    }

    /// Adds an accumulator emitting into `output`.
    pub fn accumulate(mut self, output: &str, accumulator: Accumulator) -> Self {
        self.accumulators.push((output.to_string(), accumulator));
        self
    }

    pub(crate) fn parse(spec: &Value) -> FlatdocResult<GroupSpec> {
        let spec = match spec.as_document() {
            Some(doc) => doc,
            None => {
                log::error!("$group requires a document, found {}", spec);
                return Err(FlatdocError::new(
                    "$group requires a document",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let key = match spec.get(DOC_ID) {
            Some(Value::String(field)) => Some(field.as_str()),
            Some(Value::Null) => None,
            other => {
                log::error!("$group requires a field name as _id, found {:?}", other);
                return Err(FlatdocError::new(
                    "$group requires a field name as _id",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let mut group = GroupSpec::new(key);
        for (output, accumulator) in spec.iter() {
            if output == DOC_ID {
                continue;
            }
            group.accumulators.push((output.clone(), Accumulator::parse(output, accumulator)?));
        }
        Ok(group)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub(crate) fn apply(&self, records: Vec<Document>) -> Vec<Document> {
        let mut groups: IndexMap<Value, Vec<Document>> = IndexMap::new();
        for record in records {
            let key = match &self.key {
                Some(field) => record.get_path(field).cloned().unwrap_or(Value::Null),
                None => Value::Null,
            };
            groups.entry(key).or_default().push(record);
        }

        groups
            .into_iter()
            .map(|(key, members)| {
                let mut out = Document::new();
                out.put(DOC_ID, key).ok();
                for (output, accumulator) in &self.accumulators {
                    out.put(output, accumulator.apply(&members)).ok();
                }
                out
            })
            .collect()
    }
}
