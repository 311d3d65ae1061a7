//! Typed tool inputs and the validation gate in front of every handler.
//!
//! An input type derives `JsonSchema` and `Deserialize`. The JSON Schema
//! generated from it is both what clients see in `tools/list` and what raw
//! arguments are checked against, so discovery and validation cannot drift.

use std::fmt;
use std::marker::PhantomData;

use jsonschema::{Draft, JSONSchema, ValidationError, error::ValidationErrorKind};
use rmcp::model::JsonObject;
use rmcp::schemars::{JsonSchema, generate::SchemaSettings};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::RegistryError;

/// A value that can be produced from raw tool arguments.
pub trait ToolInput: DeserializeOwned + JsonSchema + Send + 'static {
    /// Cross-field rules a JSON Schema cannot express.
    ///
    /// Runs after schema validation and decoding succeeded.
    fn refine(&self) -> Vec<ValidationIssue> {
        Vec::new()
    }
}

/// One violated rule, located by the path of keys leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &[&str], message: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// Every issue found while validating one set of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Compiled schema for one input type.
pub struct InputSchema<T> {
    document: JsonObject,
    validator: JSONSchema,
    _input: PhantomData<fn() -> T>,
}

impl<T: ToolInput> InputSchema<T> {
    /// Generate the draft-07 document for `T` and compile a validator from it.
    pub fn new() -> Result<Self, RegistryError> {
        let mut settings = SchemaSettings::draft07();
        settings.inline_subschemas = true;
        let root = settings.into_generator().into_root_schema_for::<T>();

        let document = match serde_json::to_value(&root) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(RegistryError::InvalidSchema(format!(
                    "schema for {} is not an object: {}",
                    std::any::type_name::<T>(),
                    other
                )));
            }
            Err(e) => return Err(RegistryError::InvalidSchema(e.to_string())),
        };

        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&Value::Object(document.clone()))
            .map_err(|e| RegistryError::InvalidSchema(e.to_string()))?;

        Ok(Self {
            document,
            validator,
            _input: PhantomData,
        })
    }

    /// The schema advertised to clients.
    pub fn document(&self) -> &JsonObject {
        &self.document
    }

    /// Validate raw arguments and decode them into `T`.
    ///
    /// Reports every schema violation, not just the first. Defaults declared
    /// on `T` are filled in during decoding.
    pub fn validate(&self, arguments: &JsonObject) -> Result<T, ValidationFailure> {
        let mut instance = Value::Object(arguments.clone());
        normalize_integers(&mut instance);

        let issues: Vec<ValidationIssue> = match self.validator.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(issue_from_error).collect(),
        };
        if !issues.is_empty() {
            return Err(ValidationFailure::new(issues));
        }

        let input: T = match serde_json::from_value(instance.clone()) {
            Ok(input) => input,
            Err(e) => return Err(decode_failure(&instance, &e)),
        };

        let issues = input.refine();
        if !issues.is_empty() {
            return Err(ValidationFailure::new(issues));
        }

        Ok(input)
    }
}

/// Rewrite integral floats such as `50.0` as integers.
///
/// JSON Schema counts them as integers, serde does not.
fn normalize_integers(value: &mut Value) {
    let integral = match &*value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
            .map(|f| f as i64),
        _ => None,
    };
    if let Some(i) = integral {
        *value = Value::from(i);
        return;
    }

    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_integers),
        Value::Object(map) => map.values_mut().for_each(normalize_integers),
        _ => {}
    }
}

/// Locate a decode error that got past the schema.
///
/// serde reports no path, so the error is pinned on every top-level field
/// still holding a non-integral number, the only values the schema lets
/// through that an integer field can reject.
fn decode_failure(instance: &Value, error: &serde_json::Error) -> ValidationFailure {
    let message = error.to_string();
    let mut issues: Vec<ValidationIssue> = instance
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(_, value)| value.is_f64())
        .map(|(key, _)| ValidationIssue::new(&[key.as_str()], message.clone()))
        .collect();
    if issues.is_empty() {
        issues.push(ValidationIssue::new(&[], message));
    }
    ValidationFailure::new(issues)
}

fn issue_from_error(error: ValidationError<'_>) -> ValidationIssue {
    let mut path: Vec<String> = error
        .instance_path
        .to_string()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect();

    let message = match &error.kind {
        ValidationErrorKind::Required { property } => {
            path.push(
                property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string()),
            );
            "Required".to_string()
        }
        _ => error.to_string(),
    };

    ValidationIssue { path, message }
}
