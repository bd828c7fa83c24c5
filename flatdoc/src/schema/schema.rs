use indexmap::IndexMap;

use super::{Constraint, FieldType};
use crate::collection::Document;
use crate::common::{Value, SCHEMA_ARGS, SCHEMA_REQUIRED, SCHEMA_TYPE};
use crate::errors::{ErrorKind, FlatdocError, FlatdocResult};

/// The declared shape of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    field_type: FieldType,
    required: bool,
    constraints: Vec<Constraint>,
}

impl FieldDefinition {
    pub fn new(field_type: FieldType) -> Self {
        FieldDefinition {
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn integer(mut self) -> Self {
        self.constraints.push(Constraint::Integer);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::Min(min));
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn check(&self, value: &Value) -> Option<String> {
        if !self.field_type.accepts(value) {
            return Some(self.field_type.mismatch_message().to_string());
        }
        self.constraints.iter().find_map(|c| c.check(value))
    }
}

/// A per-collection field mapping used to validate records before they are
/// written.
///
/// Checks run field by field in declaration order and stop at the first
/// failure. Fields not declared in the schema are rejected unless
/// [Schema::allow_unknown] is set.
///
/// ```rust
/// use flatdoc::doc;
/// use flatdoc::schema::{FieldDefinition, FieldType, Schema};
///
/// let schema = Schema::new()
///     .field("name", FieldDefinition::new(FieldType::String).required())
///     .field("age", FieldDefinition::new(FieldType::Number).integer().min(18.0));
///
/// assert!(schema.validate(&doc! { name: "Alice", age: 25 }).is_ok());
/// let err = schema.validate(&doc! { name: "Bob", age: 17 }).unwrap_err();
/// assert_eq!(err.message(), "Validation failed: \"age\" must be greater than or equal to 18");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, FieldDefinition>,
    allow_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Declares (or redeclares) a field.
    pub fn field(mut self, name: &str, definition: FieldDefinition) -> Self {
        self.fields.insert(name.to_string(), definition);
        self
    }

    /// Lets records carry fields the schema does not declare.
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    pub fn is_allow_unknown(&self) -> bool {
        self.allow_unknown
    }

    pub fn definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Builds a schema from a declaration record of the form
    /// `{ field: { type: "number", required: true, args: ["integer", 18] } }`.
    pub fn from_document(declaration: &Document) -> FlatdocResult<Schema> {
        let mut schema = Schema::new();
        for (name, spec) in declaration.iter() {
            let spec = spec.as_document().ok_or_else(|| {
                log::error!("Schema declaration for {} must be an object, found {}", name, spec);
                FlatdocError::new(
                    &format!("Schema declaration for {} must be an object", name),
                    ErrorKind::SchemaError,
                )
            })?;
            schema.fields.insert(name.clone(), parse_definition(name, spec)?);
        }
        Ok(schema)
    }

    /// Validates a full record: required fields must be present.
    pub fn validate(&self, document: &Document) -> FlatdocResult<()> {
        self.run(document, true)
    }

    /// Validates an update patch: only the fields it carries are checked.
    pub fn validate_partial(&self, patch: &Document) -> FlatdocResult<()> {
        self.run(patch, false)
    }

    fn run(&self, document: &Document, enforce_required: bool) -> FlatdocResult<()> {
        for (name, definition) in &self.fields {
            match document.get(name) {
                None => {
                    if enforce_required && definition.required {
                        return Err(validation_error(name, "is required"));
                    }
                }
                Some(value) => {
                    if let Some(message) = definition.check(value) {
                        return Err(validation_error(name, &message));
                    }
                }
            }
        }

        if !self.allow_unknown {
            if let Some((name, _)) = document.iter().find(|(k, _)| !self.fields.contains_key(*k)) {
                return Err(validation_error(name, "is not allowed"));
            }
        }
        Ok(())
    }
}

fn parse_definition(name: &str, spec: &Document) -> FlatdocResult<FieldDefinition> {
    let type_name = match spec.get(SCHEMA_TYPE) {
        Some(Value::String(s)) => s.as_str(),
        None => "any",
        Some(other) => {
            log::error!("Schema type for {} must be a string, found {}", name, other);
            return Err(FlatdocError::new(
                &format!("Schema type for {} must be a string", name),
                ErrorKind::SchemaError,
            ));
        }
    };
    let mut definition = FieldDefinition::new(type_name.parse()?);

    match spec.get(SCHEMA_REQUIRED) {
        None => {}
        Some(Value::Bool(required)) => definition.required = *required,
        Some(other) => {
            log::error!("Schema required flag for {} must be a boolean, found {}", name, other);
            return Err(FlatdocError::new(
                &format!("Schema required flag for {} must be a boolean", name),
                ErrorKind::SchemaError,
            ));
        }
    }

    match spec.get(SCHEMA_ARGS) {
        None => {}
        Some(Value::Array(tokens)) => {
            for token in tokens {
                definition
                    .constraints
                    .push(Constraint::parse(definition.field_type, token)?);
            }
        }
        Some(other) => {
            log::error!("Schema args for {} must be an array, found {}", name, other);
            return Err(FlatdocError::new(
                &format!("Schema args for {} must be an array", name),
                ErrorKind::SchemaError,
            ));
        }
    }
    Ok(definition)
}

fn validation_error(field: &str, message: &str) -> FlatdocError {
    let message = format!("Validation failed: \"{}\" {}", field, message);
    log::error!("{}", message);
    FlatdocError::new(&message, ErrorKind::ValidationError)
}
