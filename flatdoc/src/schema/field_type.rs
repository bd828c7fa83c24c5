use std::fmt::Display;
use std::str::FromStr;

use crate::common::{Value, INTEGER_TOKEN};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};

/// The canonical field types a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// Accepts any value, including null.
    Any,
}

impl FieldType {
    /// Checks that `value` is of this type. Null only passes [FieldType::Any].
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.as_f64().map(|n| !n.is_nan()).unwrap_or(false),
            FieldType::Boolean => value.is_bool(),
            FieldType::Object => value.is_document(),
            FieldType::Array => value.is_array(),
            FieldType::Any => true,
        }
    }

    /// The message tail used when a value is of the wrong type.
    pub(crate) fn mismatch_message(&self) -> &'static str {
        match self {
            FieldType::String => "must be a string",
            FieldType::Number => "must be a number",
            FieldType::Boolean => "must be a boolean",
            FieldType::Object => "must be of type object",
            FieldType::Array => "must be an array",
            FieldType::Any => "must be a value",
        }
    }

    fn supports_min(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Number | FieldType::Object | FieldType::Array
        )
    }
}

impl FromStr for FieldType {
    type Err = FlatdocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "boolean" => Ok(FieldType::Boolean),
            "object" => Ok(FieldType::Object),
            "array" => Ok(FieldType::Array),
            "any" => Ok(FieldType::Any),
            _ => {
                log::error!("Unknown schema field type: {}", s);
                Err(FlatdocError::new(
                    &format!("Unknown schema field type: {}", s),
                    ErrorKind::SchemaError,
                ))
            }
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// A constraint on a field value, checked in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// The number must have no fractional part.
    Integer,
    /// Lower bound: the value itself for numbers, the length for strings and
    /// arrays, the key count for objects.
    Min(f64),
}

impl Constraint {
    /// Parses one token of a declaration's `args` list: `"integer"` or a number.
    pub fn parse(field_type: FieldType, token: &Value) -> FlatdocResult<Constraint> {
        let constraint = match token {
            Value::String(s) if s == INTEGER_TOKEN => Constraint::Integer,
            v if v.is_number() => Constraint::Min(v.as_f64().unwrap_or_default()),
            _ => {
                log::error!("Invalid schema constraint token: {}", token);
                return Err(FlatdocError::new(
                    &format!("Invalid schema constraint token: {}", token),
                    ErrorKind::SchemaError,
                ));
            }
        };

        let supported = match constraint {
            Constraint::Integer => field_type == FieldType::Number,
            Constraint::Min(_) => field_type.supports_min(),
        };
        if !supported {
            log::error!("Constraint {} does not apply to type {}", token, field_type);
            return Err(FlatdocError::new(
                &format!("Constraint {} does not apply to type {}", token, field_type),
                ErrorKind::SchemaError,
            ));
        }
        Ok(constraint)
    }

    /// Returns the failure message tail if `value` violates the constraint.
    pub(crate) fn check(&self, value: &Value) -> Option<String> {
        match self {
            Constraint::Integer => {
                if value.is_integral() {
                    None
                } else {
                    Some("must be an integer".to_string())
                }
            }
            Constraint::Min(min) => {
                let (measure, message) = match value {
                    Value::String(s) => (
                        s.chars().count() as f64,
                        format!("length must be at least {} characters long", min),
                    ),
                    Value::Array(a) => {
                        (a.len() as f64, format!("must contain at least {} items", min))
                    }
                    Value::Document(d) => {
                        (d.size() as f64, format!("must have at least {} keys", min))
                    }
                    v => (
                        v.as_f64().unwrap_or(f64::NAN),
                        format!("must be greater than or equal to {}", min),
                    ),
                };
                if measure >= *min {
                    None
                } else {
                    Some(message)
                }
            }
        }
    }
}
