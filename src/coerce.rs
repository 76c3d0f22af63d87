//! Type coercion and constraint validation for declared parameters.
//!
//! Two entry points: [`from_text`] coerces a raw path segment or query value,
//! [`from_json`] applies the same primitive rules to a body field. Both
//! return the failure kind on its own; attaching the field location is the
//! dispatcher's job, which lets it collect every failure of a request before
//! reporting.

use serde_json::{Number, Value};

use crate::error::ErrorKind;
use crate::schema::{Constraints, ParamType};

/// Coerce a raw textual value (path segment or query value) to its declared
/// type.
pub fn from_text(raw: &str, ty: &ParamType) -> Result<Value, ErrorKind> {
    match ty {
        ParamType::Str | ParamType::StrList => Ok(Value::String(raw.to_owned())),
        ParamType::Int => raw
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| ErrorKind::IntParse),
        ParamType::Float => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(ErrorKind::FloatParse),
        ParamType::Bool => parse_bool(raw).map(Value::Bool),
        ParamType::Enum(spec) => {
            if spec.member_for_wire(raw).is_some() {
                Ok(Value::String(raw.to_owned()))
            } else {
                Err(ErrorKind::Enum {
                    allowed: spec.wires(),
                })
            }
        }
    }
}

/// Coerce one body field to its declared type.
///
/// String-typed JSON values go through the textual rules, so `"3"` is an
/// acceptable integer field. `null` never reaches this function; the
/// dispatcher resolves it against the field's default beforehand.
pub fn from_json(value: &Value, ty: &ParamType) -> Result<Value, ErrorKind> {
    match ty {
        ParamType::Str | ParamType::StrList => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(ErrorKind::StrType),
        },
        ParamType::Int => match value {
            Value::Number(n) => n
                .as_i64()
                .map(|n| Value::Number(n.into()))
                .ok_or(ErrorKind::IntParse),
            Value::String(s) => from_text(s, ty),
            _ => Err(ErrorKind::IntParse),
        },
        ParamType::Float => match value {
            Value::Number(n) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or(ErrorKind::FloatParse),
            Value::String(s) => from_text(s, ty),
            _ => Err(ErrorKind::FloatParse),
        },
        ParamType::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) => from_text(s, ty),
            _ => Err(ErrorKind::BoolParse),
        },
        ParamType::Enum(_) => match value {
            Value::String(s) => from_text(s, ty),
            _ => Err(ErrorKind::StrType),
        },
    }
}

/// Check the declared string constraints against a coerced value.
///
/// Constraints only ever apply to string values; for a repeated query key
/// the dispatcher calls this once per element.
pub fn check_constraints(value: &str, constraints: &Constraints) -> Result<(), ErrorKind> {
    let len = value.chars().count();
    if let Some(min) = constraints.min_length {
        if len < min {
            return Err(ErrorKind::MinLength(min));
        }
    }
    if let Some(max) = constraints.max_length {
        if len > max {
            return Err(ErrorKind::MaxLength(max));
        }
    }
    if let Some(pattern) = &constraints.pattern {
        if !pattern.is_match(value) {
            return Err(ErrorKind::Pattern);
        }
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Result<bool, ErrorKind> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ErrorKind::BoolParse),
    }
}
