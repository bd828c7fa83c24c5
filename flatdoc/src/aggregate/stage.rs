use std::fmt::Display;

use crate::aggregate::{field_reference, GroupSpec};
use crate::collection::Document;
use crate::common::{SortOrder, Value, DEFAULT_COUNT_FIELD};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};
use crate::filter::Query;

/// Parameters of a `$lookup` join.
///
/// Each record gets a new array field `as_field` holding every record of
/// collection `from` whose `local_field` equals the record's `foreign_field`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSpec {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
}

/// One typed pipeline stage.
#[derive(Debug, Clone)]
pub enum Stage {
    Match(Query),
    Sort(Vec<(String, SortOrder)>),
    Group(GroupSpec),
    Limit(i64),
    Skip(i64),
    /// Field to keep marker; fields with a falsy marker are dropped.
    Project(Vec<(String, bool)>),
    Unwind(String),
    Lookup(LookupSpec),
    /// Collapses the input into one record holding its size under this field.
    Count(String),
}

impl Stage {
    /// Parses a stage descriptor such as `{ "$limit": 5 }`.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::UnknownStage] when the stage name is not recognized.
    /// * [ErrorKind::InvalidOperation] when the descriptor does not hold
    ///   exactly one key, or the stage parameters are malformed.
    /// * Query errors from a `$match` expression.
    pub fn parse(descriptor: &Document) -> FlatdocResult<Stage> {
        if descriptor.size() != 1 {
            log::error!("Pipeline stage must have exactly one key, found {}", descriptor);
            return Err(FlatdocError::new(
                &format!("Pipeline stage must have exactly one key, found {}", descriptor.size()),
                ErrorKind::InvalidOperation,
            ));
        }

        let (name, params) = match descriptor.iter().next() {
            Some(entry) => entry,
            None => {
                return Err(FlatdocError::new("Empty pipeline stage", ErrorKind::InvalidOperation))
            }
        };

        let stage = match name.as_str() {
            "$match" => Stage::Match(Query::parse(Self::document_param(name, params)?)?),
            "$sort" => Stage::Sort(
                Self::document_param(name, params)?
                    .iter()
                    .map(|(field, direction)| (field.clone(), SortOrder::from_direction(direction)))
                    .collect(),
            ),
            "$group" => Stage::Group(GroupSpec::parse(params)?),
            "$limit" => Stage::Limit(Self::bound_param(name, params)?),
            "$skip" => Stage::Skip(Self::bound_param(name, params)?),
            "$project" => Stage::Project(
                Self::document_param(name, params)?
                    .iter()
                    .map(|(field, marker)| (field.clone(), marker.is_truthy()))
                    .collect(),
            ),
            "$unwind" => Stage::Unwind(Self::unwind_path(params)?),
            "$lookup" => Stage::Lookup(Self::lookup_spec(params)?),
            "$count" => Stage::Count(match params.as_str() {
                Some(field) if !field.is_empty() => field.to_string(),
                _ => DEFAULT_COUNT_FIELD.to_string(),
            }),
            _ => {
                log::error!("Unknown aggregation stage: {}", name);
                return Err(FlatdocError::new(
                    &format!("Unknown aggregation stage: {}", name),
                    ErrorKind::UnknownStage,
                ));
            }
        };
        Ok(stage)
    }

    /// The descriptor key of this stage.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Sort(_) => "$sort",
            Stage::Group(_) => "$group",
            Stage::Limit(_) => "$limit",
            Stage::Skip(_) => "$skip",
            Stage::Project(_) => "$project",
            Stage::Unwind(_) => "$unwind",
            Stage::Lookup(_) => "$lookup",
            Stage::Count(_) => "$count",
        }
    }

    fn document_param<'a>(name: &str, params: &'a Value) -> FlatdocResult<&'a Document> {
        params.as_document().ok_or_else(|| {
            log::error!("{} requires a document, found {}", name, params);
            FlatdocError::new(
                &format!("{} requires a document", name),
                ErrorKind::InvalidOperation,
            )
        })
    }

    fn bound_param(name: &str, params: &Value) -> FlatdocResult<i64> {
        match params {
            Value::I64(n) => Ok(*n),
            Value::F64(n) if n.is_finite() => Ok(n.trunc() as i64),
            _ => {
                log::error!("{} requires a number, found {}", name, params);
                Err(FlatdocError::new(
                    &format!("{} requires a number", name),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn unwind_path(params: &Value) -> FlatdocResult<String> {
        let path = match params {
            Value::String(path) => Some(path.as_str()),
            Value::Document(doc) => doc.get("path").and_then(|p| p.as_str()),
            _ => None,
        };
        match path {
            Some(path) if !field_reference(path).is_empty() => {
                Ok(field_reference(path).to_string())
            }
            _ => {
                log::error!("$unwind requires a field path, found {}", params);
                Err(FlatdocError::new(
                    "$unwind requires a field path",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn lookup_spec(params: &Value) -> FlatdocResult<LookupSpec> {
        let doc = Self::document_param("$lookup", params)?;
        let field = |key: &str| -> FlatdocResult<String> {
            match doc.get(key).and_then(|v| v.as_str()) {
                Some(value) => Ok(value.to_string()),
                None => {
                    log::error!("$lookup requires a string {}", key);
                    Err(FlatdocError::new(
                        &format!("$lookup requires a string {}", key),
                        ErrorKind::InvalidOperation,
                    ))
                }
            }
        };

        Ok(LookupSpec {
            from: field("from")?,
            local_field: field("localField")?,
            foreign_field: field("foreignField")?,
            as_field: field("as")?,
        })
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Match(query) => write!(f, "{{$match: {}}}", query),
            Stage::Limit(n) | Stage::Skip(n) => write!(f, "{{{}: {}}}", self.name(), n),
            Stage::Unwind(path) => write!(f, "{{$unwind: {}}}", path),
            Stage::Count(field) => write!(f, "{{$count: {}}}", field),
            _ => write!(f, "{{{}: ...}}", self.name()),
        }
    }
}
