//! Form value type.
//!
//! `FormValue` is a closed sum type over everything a submitted form can
//! carry once decoded from JSON or a form parser: null, text, numbers,
//! booleans, ordered lists and nested maps.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// Raw form data: field name to value, including the two protocol tokens.
pub type FormData = BTreeMap<String, FormValue>;

/// A single submitted form value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    /// Absent value (e.g. an unset optional input).
    #[default]
    Null,
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Ordered list of values.
    List(Vec<FormValue>),
    /// Nested map of values.
    Map(BTreeMap<String, FormValue>),
}

impl FormValue {
    /// Returns the text if this is a `Text` variant.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is a null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(v) => write!(f, "[{} items]", v.len()),
            Self::Map(m) => write!(f, "{{{} keys}}", m.len()),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for FormValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Number> for FormValue {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, FormValue>> for FormValue {
    fn from(value: BTreeMap<String, FormValue>) -> Self {
        Self::Map(value)
    }
}

impl From<HashMap<String, FormValue>> for FormValue {
    fn from(value: HashMap<String, FormValue>) -> Self {
        Self::Map(value.into_iter().collect())
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Bool(b),
            Value::Array(v) => Self::List(v.into_iter().map(Into::into).collect()),
            Value::Object(m) => Self::Map(m.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

/// Decodes through `serde_json::Value`, so numbers keep the exact digits of
/// the submitted literal.
impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_deserialize_nested_form_json() {
        let json = r#"{
            "name": "Test Tester",
            "address": {"street": "Teststreet", "number": 123},
            "valid": false,
            "email": ["a@example.com", "b@example.com"],
            "website": null
        }"#;
        let form: FormData = serde_json::from_str(json).unwrap();

        assert_eq!(form["name"], FormValue::from("Test Tester"));
        assert_eq!(form["valid"], FormValue::Bool(false));
        assert!(form["website"].is_null());
        assert!(matches!(form["email"], FormValue::List(ref v) if v.len() == 2));
        let FormValue::Map(address) = &form["address"] else {
            panic!("address should be a map");
        };
        assert_eq!(address["number"], FormValue::from(123_i64));
    }

    #[test]
    fn test_should_convert_from_json_value() {
        let value = serde_json::json!({"a": [1, "b", null], "c": true});
        let form = FormValue::from(value);
        let FormValue::Map(map) = form else {
            panic!("expected a map");
        };
        assert_eq!(
            map["a"],
            FormValue::List(vec![
                FormValue::from(1_i64),
                FormValue::from("b"),
                FormValue::Null
            ])
        );
        assert_eq!(map["c"], FormValue::Bool(true));
    }

    #[test]
    fn test_should_keep_number_literals_exact() {
        let form: FormData =
            serde_json::from_str(r#"{"order": 123456789012345678901234, "ratio": 1e20}"#).unwrap();

        assert_eq!(form["order"].to_string(), "123456789012345678901234");
        assert_eq!(form["ratio"].to_string(), "1e20");
        assert_eq!(form["order"].type_name(), "number");
    }

    #[test]
    fn test_should_map_none_to_null() {
        assert!(FormValue::from(None::<String>).is_null());
        assert_eq!(FormValue::from(Some("x")), FormValue::from("x"));
    }

    #[test]
    fn test_should_report_type_names() {
        assert_eq!(FormValue::Null.type_name(), "null");
        assert_eq!(FormValue::from(1_i64).type_name(), "number");
        assert_eq!(FormValue::from(vec!["a"]).type_name(), "list");
    }
}
