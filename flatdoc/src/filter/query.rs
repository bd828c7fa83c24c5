use std::fmt::Display;

use crate::collection::Document;
use crate::common::{Value, STAGE_PREFIX};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};

use super::Operator;

/// The constraint a query places on one field.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The field must equal the literal value structurally.
    Literal(Value),
    /// Every operator of an operator-mapping such as `{ "$gt": 1, "$lt": 9 }`.
    Operators(Vec<Operator>),
}

impl Condition {
    fn parse(field: &str, condition: &Value) -> FlatdocResult<Condition> {
        let mapping = match condition.as_document() {
            Some(doc) if doc.iter().any(|(key, _)| key.starts_with(STAGE_PREFIX)) => doc,
            _ => return Ok(Condition::Literal(condition.clone())),
        };

        let mut operators = Vec::with_capacity(mapping.size());
        for (name, arg) in mapping.iter() {
            if !name.starts_with(STAGE_PREFIX) {
                log::error!(
                    "Operator-mapping for field {} mixes operators with field {}",
                    field,
                    name
                );
                return Err(FlatdocError::new(
                    &format!("Unsupported operator: {}", name),
                    ErrorKind::UnsupportedOperator,
                ));
            }
            operators.push(Operator::parse(name, arg)?);
        }
        Ok(Condition::Operators(operators))
    }

    /// Match polarity: every operator must hold.
    fn is_satisfied(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Literal(expected) => value == Some(expected),
            Condition::Operators(operators) => operators.iter().all(|op| op.test(value)),
        }
    }

    /// Delete polarity: the first operator that holds marks the field.
    fn is_selected_for_delete(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Literal(expected) => value == Some(expected),
            Condition::Operators(operators) => operators.iter().any(|op| op.test(value)),
        }
    }
}

/// A compiled query expression.
///
/// A query is a mapping of field path to either a literal value or an
/// operator-mapping. Fields are combined with an implicit AND, and an empty
/// query matches every record.
///
/// ```rust
/// use flatdoc::doc;
/// use flatdoc::filter::Query;
///
/// let query = Query::parse(&doc! { age: { "$gte": 25 }, city: "New York" }).unwrap();
/// assert!(query.matches(&doc! { name: "Alice", age: 25, city: "New York" }));
/// assert!(!query.matches(&doc! { name: "Bob", age: 30, city: "Los Angeles" }));
/// ```
///
/// Queries carry two evaluation polarities. [Query::matches] is used by find,
/// update and the `$match` stage; within an operator-mapping it stops at the
/// first operator that does not hold. [Query::selects_for_delete] is used by
/// delete; within an operator-mapping it stops at the first operator that
/// does hold. With a single operator per field both agree.
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<(String, Condition)>,
}

impl Query {
    /// Compiles a query expression.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::UnsupportedOperator] or [ErrorKind::FilterError]
    /// when an operator-mapping is malformed.
    pub fn parse(expression: &Document) -> FlatdocResult<Query> {
        let mut clauses = Vec::with_capacity(expression.size());
        for (field, condition) in expression.iter() {
            clauses.push((field.clone(), Condition::parse(field, condition)?));
        }
        Ok(Query { clauses })
    }

    /// A query that matches every record.
    pub fn all() -> Query {
        Query::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Checks whether a record satisfies every field constraint.
    pub fn matches(&self, record: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.is_satisfied(record.get_path(field)))
    }

    /// Checks whether a delete with this query removes the record.
    pub fn selects_for_delete(&self, record: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.is_selected_for_delete(record.get_path(field)))
    }

    /// Returns the fields constrained by literal equality, in query order.
    pub fn literal_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.clauses.iter().filter_map(|(field, condition)| match condition {
            Condition::Literal(value) => Some((field.as_str(), value)),
            Condition::Operators(_) => None,
        })
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (field, condition)) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match condition {
                Condition::Literal(value) => write!(f, "{}: {}", field, value)?,
                Condition::Operators(operators) => {
                    let ops: Vec<String> = operators.iter().map(|op| op.to_string()).collect();
                    write!(f, "{}: {{{}}}", field, ops.join(", "))?
                }
            }
        }
        write!(f, "}}")
    }
}
