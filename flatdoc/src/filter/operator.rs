use regex::Regex;
use std::cmp::Ordering;
use std::fmt::Display;

use crate::common::Value;
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};

/// One comparison, set or pattern test inside an operator-mapping such as
/// `{ "$gte": 18, "$lt": 65 }`.
///
/// Operators are parsed once when a query is compiled, so an unknown operator
/// or a malformed argument fails the call before any record is examined.
///
/// Every operator is given the field value as `Option<&Value>`: `None` means
/// the record has no such field. Range operators never hold for a missing or
/// incomparable value, `$ne` and `$nin` always do.
#[derive(Debug, Clone)]
pub enum Operator {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Regex(Regex),
}

impl Operator {
    /// Parses an operator name and its argument.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::UnsupportedOperator] for an unknown operator name.
    /// * [ErrorKind::FilterError] when `$in`/`$nin` are not given an array, or
    ///   when a `$regex` pattern does not compile.
    pub fn parse(name: &str, arg: &Value) -> FlatdocResult<Operator> {
        let op = match name {
            "$eq" => Operator::Eq(arg.clone()),
            "$ne" => Operator::Ne(arg.clone()),
            "$gt" => Operator::Gt(arg.clone()),
            "$gte" => Operator::Gte(arg.clone()),
            "$lt" => Operator::Lt(arg.clone()),
            "$lte" => Operator::Lte(arg.clone()),
            "$in" => Operator::In(Self::membership_list(name, arg)?),
            "$nin" => Operator::Nin(Self::membership_list(name, arg)?),
            "$regex" => {
                let pattern = arg.to_text();
                match Regex::new(&pattern) {
                    Ok(regex) => Operator::Regex(regex),
                    Err(e) => {
                        log::error!("Invalid regex pattern '{}': {}", pattern, e);
                        return Err(e.into());
                    }
                }
            }
            _ => {
                log::error!("Unsupported operator: {}", name);
                return Err(FlatdocError::new(
                    &format!("Unsupported operator: {}", name),
                    ErrorKind::UnsupportedOperator,
                ));
            }
        };
        Ok(op)
    }

    fn membership_list(name: &str, arg: &Value) -> FlatdocResult<Vec<Value>> {
        match arg.as_array() {
            Some(values) => Ok(values.clone()),
            None => {
                log::error!("{} requires an array argument, found {}", name, arg);
                Err(FlatdocError::new(
                    &format!("{} requires an array argument", name),
                    ErrorKind::FilterError,
                ))
            }
        }
    }

    /// Tests the operator against a record's field value.
    pub fn test(&self, field_value: Option<&Value>) -> bool {
        match self {
            Operator::Eq(expected) => field_value == Some(expected),
            Operator::Ne(expected) => field_value != Some(expected),
            Operator::Gt(bound) => Self::ordered(field_value, bound, |o| o == Ordering::Greater),
            Operator::Gte(bound) => Self::ordered(field_value, bound, |o| o != Ordering::Less),
            Operator::Lt(bound) => Self::ordered(field_value, bound, |o| o == Ordering::Less),
            Operator::Lte(bound) => Self::ordered(field_value, bound, |o| o != Ordering::Greater),
            Operator::In(values) => match field_value {
                Some(value) => values.contains(value),
                None => false,
            },
            Operator::Nin(values) => match field_value {
                Some(value) => !values.contains(value),
                None => true,
            },
            Operator::Regex(regex) => match field_value {
                Some(value) => regex.is_match(&value.to_text()),
                None => false,
            },
        }
    }

    #[inline]
    fn ordered(
        field_value: Option<&Value>,
        bound: &Value,
        accept: impl Fn(Ordering) -> bool,
    ) -> bool {
        field_value
            .and_then(|value| value.compare(bound))
            .map(accept)
            .unwrap_or(false)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq(_) => "$eq",
            Operator::Ne(_) => "$ne",
            Operator::Gt(_) => "$gt",
            Operator::Gte(_) => "$gte",
            Operator::Lt(_) => "$lt",
            Operator::Lte(_) => "$lte",
            Operator::In(_) => "$in",
            Operator::Nin(_) => "$nin",
            Operator::Regex(_) => "$regex",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq(v)
            | Operator::Ne(v)
            | Operator::Gt(v)
            | Operator::Gte(v)
            | Operator::Lt(v)
            | Operator::Lte(v) => write!(f, "{}: {}", self.name(), v),
            Operator::In(values) | Operator::Nin(values) => {
                write!(f, "{}: {}", self.name(), Value::Array(values.clone()))
            }
            Operator::Regex(regex) => write!(f, "{}: /{}/", self.name(), regex.as_str()),
        }
    }
}
