//! Parsed, validated arguments handed to a route handler.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::DispatchError;

/// The coerced parameters of one matched request.
///
/// Path and query parameters live in one flat map under their declared
/// names; the validated body, when the route declares one, is a JSON object
/// with every schema field bound (absent optional fields carry their
/// declared default, `null` when none was given). An optional parameter
/// without a default that was absent from the request is simply not present.
#[derive(Debug, Default)]
pub struct Args {
    values: BTreeMap<String, Value>,
    body: Option<Value>,
}

impl Args {
    pub(crate) fn new(values: BTreeMap<String, Value>, body: Option<Value>) -> Self {
        Args { values, body }
    }

    /// The raw coerced value of a path or query parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// The elements of a list-typed query parameter, in URL occurrence order.
    pub fn list(&self, name: &str) -> Option<&Vec<Value>> {
        self.get(name)?.as_array()
    }

    /// The validated request body, when the route declares a body schema.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// One field of the validated body. Present for every declared field;
    /// optional fields without a supplied value hold their default.
    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref()?.get(name)
    }

    /// A body field as a number, for handlers that compute with it.
    ///
    /// An absent or null field is a computation error, never a silent zero:
    /// a handler that adds `price + tax` fails loudly when `tax` was not
    /// supplied and carries no default.
    pub fn body_number(&self, name: &str) -> Result<f64, DispatchError> {
        match self.body_field(name) {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| absent(name)),
            Some(Value::Null) | None => Err(absent(name)),
            Some(_) => Err(absent(name)),
        }
    }
}

fn absent(name: &str) -> DispatchError {
    DispatchError::Computation(format!(
        "cannot compute with absent or non-numeric field '{}'",
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> Args {
        let mut values = BTreeMap::new();
        values.insert("item_id".to_owned(), json!(5));
        values.insert("q".to_owned(), json!("fixedquery"));
        Args::new(
            values,
            Some(json!({"name": "Axe", "price": 10.5, "tax": null})),
        )
    }

    #[test]
    fn typed_accessors() {
        let a = args();
        assert_eq!(a.int("item_id"), Some(5));
        assert_eq!(a.str("q"), Some("fixedquery"));
        assert_eq!(a.bool("q"), None);
        assert!(a.get("missing").is_none());
    }

    #[test]
    fn body_number_rejects_null() {
        let a = args();
        assert_eq!(a.body_number("price").unwrap(), 10.5);
        assert!(matches!(
            a.body_number("tax"),
            Err(DispatchError::Computation(_))
        ));
    }
}
