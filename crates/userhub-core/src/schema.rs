//! Declarative request schema validation.
//!
//! A schema is a request DTO that implements [`Schema`]: it lists its fields
//! (so raw JSON can be type-checked before deserialization), normalizes
//! values after deserialization (trim, lowercase, blank-as-absent), and then
//! runs its `validator` rules. [`validate`] drives the whole chain:
//!
//! 1. the payload must be a JSON object
//! 2. each declared field must be present when required and must be a string
//! 3. the object is deserialized into the DTO, with an empty string standing
//!    in for every field that failed step 2
//! 4. [`Schema::normalize`] runs
//! 5. [`Validate::validate`] runs and its errors are flattened to one
//!    message per field
//!
//! Errors from steps 2 and 5 are merged, and a field keeps the message from
//! step 2 when both report it. A payload with a missing `name` and a bad
//! `email` therefore reports both fields.
//!
//! Any failure is a [`SchemaError`]. Callers never see engine-specific shapes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::FieldErrors;

/// Key used for errors that belong to no particular field.
pub const FORM_FIELD: &str = "form";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{} field(s) failed validation", .0.len())]
    Fields(FieldErrors),
    #[error("validation failed")]
    Generic,
}

impl SchemaError {
    fn form(message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(FORM_FIELD.to_string(), message.into());
        Self::Fields(errors)
    }

    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            Self::Fields(errors) => errors,
            Self::Generic => {
                let mut errors = FieldErrors::new();
                errors.insert(FORM_FIELD.to_string(), "Validation failed".to_string());
                errors
            }
        }
    }
}

/// A string field declared by a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

pub trait Schema: DeserializeOwned + Validate {
    const FIELDS: &'static [FieldSpec];

    /// Coerces values before the rules run.
    fn normalize(&mut self) {}
}

/// Validates `raw` against `T` and returns the normalized value.
pub fn validate<T: Schema>(raw: Value) -> Result<T, SchemaError> {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            return Err(SchemaError::form(format!(
                "Expected object, received {}",
                json_type_name(&other)
            )));
        }
    };

    let mut errors = FieldErrors::new();
    for spec in T::FIELDS {
        let message = match fields.get(spec.name) {
            None if spec.required => "Required".to_string(),
            None | Some(Value::String(_)) => continue,
            Some(other) => format!("Expected string, received {}", json_type_name(other)),
        };
        errors.insert(spec.name.to_string(), message);

        if spec.required {
            fields.insert(spec.name.to_string(), Value::String(String::new()));
        } else {
            fields.remove(spec.name);
        }
    }

    let mut value: T = match serde_json::from_value(Value::Object(fields)) {
        Ok(value) => value,
        Err(_) if !errors.is_empty() => return Err(SchemaError::Fields(errors)),
        Err(_) => return Err(SchemaError::Generic),
    };
    value.normalize();

    if let Err(rule_errors) = value.validate() {
        for (field, message) in flatten_errors(&rule_errors) {
            errors.entry(field).or_insert(message);
        }
    }

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(SchemaError::Fields(errors))
    }
}

/// Flattens `validator` errors into dot-joined paths, keeping the first
/// message recorded for each field.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut flat = FieldErrors::new();
    collect_errors(errors, None, &mut flat);
    if flat.is_empty() {
        flat.insert(FORM_FIELD.to_string(), "Validation failed".to_string());
    }
    flat
}

fn collect_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| "Invalid input".to_string());
                    out.entry(path).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item_path = format!("{path}.{index}");
                    collect_errors(nested, Some(&item_path), out);
                }
            }
        }
    }
}

fn join_path(prefix: Option<&str>, field: &str) -> String {
    // validator files struct-level errors under "__all__"
    let field = if field == "__all__" { FORM_FIELD } else { field };
    match prefix {
        Some(prefix) if field == FORM_FIELD => prefix.to_string(),
        Some(prefix) => format!("{prefix}.{field}"),
        None => field.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
