//! Argument values attached to fields.
//!
//! An [`ArgumentValue`] is an explicit variant: the caller decides whether a
//! collection is a list or an input object when building it, so rendering never
//! has to guess from the shape of the keys.

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key marking a variable reference in the serde representation of an
/// [`ArgumentValue`].
pub const VARIABLE_KEY: &str = "$variable";

/// A named placeholder whose value travels in the `variables` field of the
/// request instead of being inlined in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    value: Value,
}

impl Variable {
    /// Create a variable of the given GraphQL type, e.g. `ID!` or `[String]`.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

/// A value in argument position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Any JSON literal. Rendered with its JSON encoding.
    Scalar(Value),
    /// Rendered as `[ ... ]`.
    List(Vec<ArgumentValue>),
    /// Rendered as `{ key : value ... }`, in insertion order.
    Object(IndexMap<String, ArgumentValue>),
    /// Rendered as `$name` and declared on the operation.
    Variable(Variable),
}

impl ArgumentValue {
    /// Build an input object from `(key, value)` pairs, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from anything convertible into argument values.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(Value::Null)
    }
}

impl From<Value> for ArgumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<Variable> for ArgumentValue {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<&Variable> for ArgumentValue {
    fn from(variable: &Variable) -> Self {
        Self::Variable(variable.clone())
    }
}

impl<T: Into<Self>> From<Vec<T>> for ArgumentValue {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for ArgumentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArgumentValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u32, u64, f64, String, &str);

impl Serialize for ArgumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
            Self::Object(members) => members.serialize(serializer),
            Self::Variable(variable) => {
                let mut wrapper = IndexMap::with_capacity(1);
                wrapper.insert(VARIABLE_KEY, variable);
                wrapper.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for ArgumentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_tagged_value(value).map_err(de::Error::custom)
    }
}

/// Like `From<Value>`, but recognizes `{"$variable": {...}}` wrappers.
fn from_tagged_value(value: Value) -> Result<ArgumentValue, serde_json::Error> {
    match value {
        Value::Object(mut members) if members.len() == 1 && members.contains_key(VARIABLE_KEY) => {
            let inner = members.remove(VARIABLE_KEY).unwrap_or(Value::Null);
            Ok(ArgumentValue::Variable(serde_json::from_value(inner)?))
        }
        Value::Object(members) => members
            .into_iter()
            .map(|(k, v)| Ok((k, from_tagged_value(v)?)))
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(ArgumentValue::Object),
        Value::Array(items) => items
            .into_iter()
            .map(from_tagged_value)
            .collect::<Result<Vec<_>, _>>()
            .map(ArgumentValue::List),
        scalar => Ok(ArgumentValue::Scalar(scalar)),
    }
}

/// Convert an argument back to the JSON that would be sent if it were inlined.
/// Variables become their value.
impl From<&ArgumentValue> for Value {
    fn from(arg: &ArgumentValue) -> Self {
        match arg {
            ArgumentValue::Scalar(value) => value.clone(),
            ArgumentValue::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            ArgumentValue::Object(members) => Self::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect::<Map<_, _>>(),
            ),
            ArgumentValue::Variable(variable) => variable.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_objects_and_arrays_become_lists() {
        let arg = ArgumentValue::from(json!({"ids": [1, 2], "name": "x"}));
        let ArgumentValue::Object(members) = arg else {
            panic!("expected object");
        };
        assert_eq!(members.keys().collect::<Vec<_>>(), ["ids", "name"]);
        assert!(matches!(members["ids"], ArgumentValue::List(ref items) if items.len() == 2));
        assert_eq!(members["name"], ArgumentValue::from("x"));
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(ArgumentValue::from(None::<i64>), ArgumentValue::null());
        assert_eq!(ArgumentValue::from(Some(3)), ArgumentValue::Scalar(json!(3)));
    }

    #[test]
    fn deserialize_recognizes_variable_wrapper() {
        let arg: ArgumentValue = serde_json::from_value(json!({
            "input": {"$variable": {"name": "id", "type": "ID!", "value": "abc"}},
            "tags": ["x"]
        }))
        .expect("valid argument");

        let ArgumentValue::Object(members) = arg else {
            panic!("expected object");
        };
        assert_eq!(
            members["input"],
            ArgumentValue::Variable(Variable::new("id", "ID!", "abc"))
        );
        assert_eq!(members["tags"], ArgumentValue::list(["x"]));
    }

    #[test]
    fn variable_value_defaults_to_null() {
        let arg: ArgumentValue =
            serde_json::from_value(json!({"$variable": {"name": "id", "type": "ID"}}))
                .expect("valid argument");
        assert_eq!(arg, ArgumentValue::Variable(Variable::new("id", "ID", Value::Null)));
    }

    #[test]
    fn serialize_then_deserialize_keeps_variables() {
        let arg = ArgumentValue::object([
            ("id", ArgumentValue::from(Variable::new("id", "ID!", "abc"))),
            ("limit", ArgumentValue::from(10)),
        ]);
        let json = serde_json::to_value(&arg).expect("serialize");
        assert_eq!(
            json,
            json!({"id": {"$variable": {"name": "id", "type": "ID!", "value": "abc"}}, "limit": 10})
        );
        let back: ArgumentValue = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, arg);
    }

    #[test]
    fn inlined_json_substitutes_variable_values() {
        let arg = ArgumentValue::object([
            ("id", ArgumentValue::from(Variable::new("id", "ID!", "abc"))),
            ("n", ArgumentValue::from(1)),
        ]);
        assert_eq!(Value::from(&arg), json!({"id": "abc", "n": 1}));
    }
}
