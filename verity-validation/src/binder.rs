// Field binding from request sources

use crate::{ValidationError, ValidationOutcome};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Key under which body-level failures are reported
pub const BODY_FIELD: &str = "$";

/// Types a request field can be converted into
pub trait FromField: Sized {
    /// Human readable target type, used in binding messages
    const EXPECTED: &'static str;

    fn from_json(value: &Value) -> Option<Self>;

    fn from_text(text: &str) -> Option<Self>;
}

impl FromField for String {
    const EXPECTED: &'static str = "a string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn from_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl FromField for i32 {
    const EXPECTED: &'static str = "a 32-bit integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn from_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

enum Source<'a> {
    Json(&'a Map<String, Value>),
    Query(&'a HashMap<String, String>),
}

/// Reads typed field values out of a JSON object or a query map
///
/// Absent keys and JSON `null` bind to `None` and are left for the rules to
/// reject. Values that are present but cannot be converted also bind to
/// `None`, and a `BindingFailure` is recorded under the field name.
pub struct FieldBinder<'a> {
    source: Source<'a>,
    outcome: ValidationOutcome,
}

impl<'a> FieldBinder<'a> {
    /// Bind from a JSON object; keys match case-insensitively
    pub fn json(object: &'a Map<String, Value>) -> Self {
        Self {
            source: Source::Json(object),
            outcome: ValidationOutcome::new(),
        }
    }

    /// Bind from decoded query parameters
    pub fn query(params: &'a HashMap<String, String>) -> Self {
        Self {
            source: Source::Query(params),
            outcome: ValidationOutcome::new(),
        }
    }

    /// Parse a request body into a JSON object
    ///
    /// Failures are keyed by `$`.
    pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::binding(
                BODY_FIELD,
                "A non-empty request body is required.",
            ));
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ValidationError::binding(
                BODY_FIELD,
                format!(
                    "The request body must be a JSON object, found {}.",
                    json_type(&other)
                ),
            )),
            Err(e) => Err(ValidationError::binding(
                BODY_FIELD,
                format!("The request body is not valid JSON: {}.", e),
            )),
        }
    }

    /// Read `key` from the source and convert it, reporting failures as `field`
    pub fn bind<T: FromField>(&mut self, key: &str, field: &str) -> Option<T> {
        match self.source {
            Source::Json(object) => {
                let value = lookup(object, key)?;
                if value.is_null() {
                    return None;
                }
                let bound = T::from_json(value);
                if bound.is_none() {
                    self.reject::<T>(field, &value.to_string());
                }
                bound
            }
            Source::Query(params) => {
                let text = lookup(params, key)?;
                let bound = T::from_text(text);
                if bound.is_none() {
                    self.reject::<T>(field, text);
                }
                bound
            }
        }
    }

    /// Fields that failed to convert
    pub fn failures(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> ValidationOutcome {
        self.outcome
    }

    fn reject<T: FromField>(&mut self, field: &str, raw: &str) {
        self.outcome.add(
            ValidationError::binding(
                field,
                format!(
                    "The value '{}' is not valid for {}; expected {}.",
                    raw,
                    field,
                    T::EXPECTED
                ),
            )
            .with_value(raw),
        );
    }
}

/// Exact key first, then the first case-insensitive match
fn lookup<'m, V: 'm, C>(entries: C, key: &str) -> Option<&'m V>
where
    C: IntoIterator<Item = (&'m String, &'m V)> + Copy,
{
    entries
        .into_iter()
        .find(|(k, _)| k.as_str() == key)
        .or_else(|| {
            entries
                .into_iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
        })
        .map(|(_, v)| v)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViolationKind;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_json_binding_is_case_insensitive() {
        let body = object(json!({"NAME": "Arthur", "age": 42}));
        let mut binder = FieldBinder::json(&body);
        assert_eq!(binder.bind::<String>("name", "Name"), Some("Arthur".into()));
        assert_eq!(binder.bind::<i32>("Age", "Age"), Some(42));
        assert!(binder.into_outcome().is_valid());
    }

    #[test]
    fn test_json_null_and_missing_bind_to_none() {
        let body = object(json!({"name": null}));
        let mut binder = FieldBinder::json(&body);
        assert_eq!(binder.bind::<String>("name", "Name"), None);
        assert_eq!(binder.bind::<i32>("age", "Age"), None);
        assert!(binder.failures().is_valid());
    }

    #[test]
    fn test_json_type_mismatch_is_recorded() {
        let body = object(json!({"age": "forty-two", "name": 7}));
        let mut binder = FieldBinder::json(&body);
        assert_eq!(binder.bind::<i32>("age", "Age"), None);
        assert_eq!(binder.bind::<String>("name", "Name"), None);

        let outcome = binder.into_outcome();
        assert_eq!(outcome.fields(), vec!["Age", "Name"]);
        assert!(outcome.errors().iter().all(|e| e.kind == ViolationKind::BindingFailure));
        assert!(outcome.messages("Age")[0].contains("\"forty-two\""));
    }

    #[test]
    fn test_json_integer_out_of_range() {
        let body = object(json!({"age": 4_000_000_000i64}));
        let mut binder = FieldBinder::json(&body);
        assert_eq!(binder.bind::<i32>("age", "Age"), None);
        assert_eq!(binder.failures().len(), 1);
    }

    #[test]
    fn test_query_binding() {
        let params = HashMap::from([
            ("value".to_string(), "abc".to_string()),
            ("text".to_string(), "Zaphod".to_string()),
        ]);
        let mut binder = FieldBinder::query(&params);
        assert_eq!(binder.bind::<String>("text", "text"), Some("Zaphod".into()));
        assert_eq!(binder.bind::<i32>("value", "value"), None);

        let outcome = binder.into_outcome();
        assert_eq!(
            outcome.messages("value"),
            vec!["The value 'abc' is not valid for value; expected a 32-bit integer."]
        );
    }

    #[test]
    fn test_parse_body() {
        assert!(FieldBinder::parse_body(br#"{"name":"Arthur"}"#).is_ok());

        let empty = FieldBinder::parse_body(b"  ").unwrap_err();
        assert_eq!(empty.field, BODY_FIELD);

        let malformed = FieldBinder::parse_body(b"{\"name\":").unwrap_err();
        assert!(malformed.message.starts_with("The request body is not valid JSON"));

        let array = FieldBinder::parse_body(b"[1,2]").unwrap_err();
        assert!(array.message.contains("an array"));
    }
}
