//! Request-scoped error taxonomy.
//!
//! Every failure below is recoverable per-request and is reported to the
//! caller as a structured JSON payload; nothing here unwinds. Startup-time
//! misconfiguration (a malformed route table) panics at registration instead
//! and never reaches this module.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a single declared field failed coercion or validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Required and absent, with no declared default.
    Missing,
    /// Not parseable as a base-10 integer.
    IntParse,
    /// A string was expected and something else was supplied.
    StrType,
    /// Not parseable as a float.
    FloatParse,
    /// Not one of `true`/`false`/`1`/`0` (case-insensitive).
    BoolParse,
    /// Not a wire value of the declared enumeration.
    Enum { allowed: Vec<String> },
    /// Shorter than the declared minimum length.
    MinLength(usize),
    /// Longer than the declared maximum length.
    MaxLength(usize),
    /// Did not match the declared pattern.
    Pattern,
    /// Request payload was not valid JSON.
    JsonDecode,
    /// Request payload was valid JSON but not an object.
    Dict,
}

impl ErrorKind {
    /// Stable machine-readable code, one per kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "value_error.missing",
            ErrorKind::IntParse => "type_error.integer",
            ErrorKind::StrType => "type_error.str",
            ErrorKind::FloatParse => "type_error.float",
            ErrorKind::BoolParse => "type_error.bool",
            ErrorKind::Enum { .. } => "type_error.enum",
            ErrorKind::MinLength(_) => "value_error.str.min_length",
            ErrorKind::MaxLength(_) => "value_error.str.max_length",
            ErrorKind::Pattern => "value_error.str.pattern",
            ErrorKind::JsonDecode => "value_error.jsondecode",
            ErrorKind::Dict => "type_error.dict",
        }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        match self {
            ErrorKind::Missing => "field required".to_owned(),
            ErrorKind::IntParse => "value is not a valid integer".to_owned(),
            ErrorKind::StrType => "str type expected".to_owned(),
            ErrorKind::FloatParse => "value is not a valid float".to_owned(),
            ErrorKind::BoolParse => "value could not be parsed to a boolean".to_owned(),
            ErrorKind::Enum { allowed } => {
                let permitted: Vec<String> =
                    allowed.iter().map(|w| format!("'{}'", w)).collect();
                format!(
                    "value is not a valid enumeration member; permitted: {}",
                    permitted.join(", ")
                )
            }
            ErrorKind::MinLength(n) => {
                format!("ensure this value has at least {} characters", n)
            }
            ErrorKind::MaxLength(n) => {
                format!("ensure this value has at most {} characters", n)
            }
            ErrorKind::Pattern => "string does not match expected pattern".to_owned(),
            ErrorKind::JsonDecode => "invalid JSON body".to_owned(),
            ErrorKind::Dict => "value is not a valid dict".to_owned(),
        }
    }

    /// Attach a field location, producing a reportable error.
    pub fn at(self, loc: &[&str]) -> FieldError {
        FieldError {
            loc: loc.iter().map(|s| (*s).to_owned()).collect(),
            msg: self.message(),
            code: self.code(),
        }
    }
}

/// One entry of a validation failure report.
///
/// Serializes to the wire shape `{"loc": [...], "msg": "...", "type": "..."}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    /// Path to the offending field, e.g. `["query", "q"]` or `["body", "price"]`.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub code: &'static str,
}

/// The outcome of dispatching one request, when it is not a success.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registered route matches the request method and path.
    #[error("no route matches the request")]
    RouteNotFound,

    /// One or more declared parameters failed coercion or validation.
    /// Errors are collected across all parameters of the request.
    #[error("parameter validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The handler could not compute its response, e.g. arithmetic on an
    /// absent optional field.
    #[error("handler computation failed: {0}")]
    Computation(String),
}

impl DispatchError {
    /// The JSON payload reported to the caller.
    pub fn detail(&self) -> Value {
        match self {
            DispatchError::RouteNotFound => Value::String("Not Found".to_owned()),
            DispatchError::Validation(errors) => {
                serde_json::to_value(errors).unwrap_or(Value::Null)
            }
            DispatchError::Computation(msg) => Value::String(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_error_wire_shape() {
        let err = ErrorKind::Missing.at(&["body", "price"]);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"loc": ["body", "price"], "msg": "field required", "type": "value_error.missing"})
        );
    }

    #[test]
    fn enum_message_lists_allowed_values() {
        let kind = ErrorKind::Enum {
            allowed: vec!["abc".into(), "def".into(), "ghi".into()],
        };
        assert_eq!(
            kind.message(),
            "value is not a valid enumeration member; permitted: 'abc', 'def', 'ghi'"
        );
    }
}
