//! Response shape validation.
//!
//! Responses are checked once, at the system boundary: the raw decoded body
//! is matched against the endpoint's expected shape and numeric bounds, and
//! a failure enumerates every offending field. Code past this point works
//! with plain typed structs and never re-validates.

use std::fmt;

use serde_json::Value;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Path of the offending field, e.g. `[2].fares[0].price_in_cents`.
    pub path: String,
    /// The violated constraint.
    pub constraint: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.constraint)
    }
}

/// A response body that does not match the endpoint's schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The top-level payload was expected to be an array.
    #[error("expected array")]
    ExpectedArray,

    /// A declared field is missing or has the wrong type.
    #[error("{path}: {message}")]
    Shape { path: String, message: String },

    /// One or more fields violated a declared bound.
    #[error("{}", summarize(.0))]
    Bounds(Vec<FieldViolation>),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Name of a JSON value's type, for shape error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Record a violation unless `value` is strictly positive.
pub fn require_positive(value: i64, path: &str, violations: &mut Vec<FieldViolation>) {
    if value <= 0 {
        violations.push(FieldViolation {
            path: path.to_string(),
            constraint: format!("must be positive, got {value}"),
        });
    }
}

/// Record a violation unless `value` lies within `[min, max]`.
pub fn require_in_range(
    value: i64,
    min: i64,
    max: i64,
    path: &str,
    violations: &mut Vec<FieldViolation>,
) {
    if value < min || value > max {
        violations.push(FieldViolation {
            path: path.to_string(),
            constraint: format!("must be between {min} and {max}, got {value}"),
        });
    }
}

/// Record a violation unless the array has at least one element.
pub fn require_non_empty(len: usize, path: &str, violations: &mut Vec<FieldViolation>) {
    if len == 0 {
        violations.push(FieldViolation {
            path: path.to_string(),
            constraint: "must not be empty".to_string(),
        });
    }
}
