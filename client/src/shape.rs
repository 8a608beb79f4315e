//! Response shape assertions.
//!
//! An expected [`Field`] tree is matched against a JSON response fragment.
//! Objects must contain every expected field; lists are looked through, so
//! the same tree validates a single record and a list of records. Only JSON
//! arrays are lists: an empty object `{}` still has to hold the expected keys.

use gtc_document::Field;
use serde_json::Value;

/// Path label of the fragment passed to [`check_fields`].
const ROOT: &str = "$";

/// The first difference between an expected field tree and a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("expected field `{field}` is missing at `{path}`")]
    MissingField { field: String, path: String },

    #[error("expected field `{field}` at `{path}`, but found {found} instead of an object or list")]
    NotAnObject {
        field: String,
        path: String,
        found: &'static str,
    },
}

impl ShapeMismatch {
    /// Name of the expected field that could not be matched.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::NotAnObject { field, .. } => field,
        }
    }

    /// Location of the object that lacked the field, e.g. `$.posts[2]`.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path, .. } | Self::NotAnObject { path, .. } => path,
        }
    }
}

/// Check every field of `expected` against `actual`.
///
/// # Errors
/// Returns the first [`ShapeMismatch`] in depth-first order.
pub fn check_fields(expected: &[Field], actual: &Value) -> Result<(), ShapeMismatch> {
    expected
        .iter()
        .try_for_each(|field| check_at(field, actual, ROOT))
}

/// Check one expected field, and its children, against `actual`.
///
/// # Errors
/// Returns the first [`ShapeMismatch`] in depth-first order.
pub fn check_field(field: &Field, actual: &Value) -> Result<(), ShapeMismatch> {
    check_at(field, actual, ROOT)
}

fn check_at(field: &Field, actual: &Value, path: &str) -> Result<(), ShapeMismatch> {
    match actual {
        Value::Object(members) => {
            let Some(value) = members.get(field.name()) else {
                return Err(ShapeMismatch::MissingField {
                    field: field.name().to_string(),
                    path: path.to_string(),
                });
            };
            if value.is_null() {
                return Ok(());
            }
            let path = format!("{path}.{}", field.name());
            field
                .child_fields()
                .iter()
                .try_for_each(|child| check_at(child, value, &path))
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .try_for_each(|(index, item)| check_at(field, item, &format!("{path}[{index}]"))),
        other => Err(ShapeMismatch::NotAnObject {
            field: field.name().to_string(),
            path: path.to_string(),
            found: kind(other),
        }),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Fail the current test unless `actual` contains every field selected by
/// `query`.
///
/// `actual` is the operation's payload (see
/// [`ResponseData::data`](crate::ResponseData::data)), so the children of
/// `query` are matched against it, not `query` itself.
///
/// # Panics
/// Panics with the missing field's name and location on the first mismatch.
#[allow(clippy::panic)]
pub fn assert_graphql_fields(actual: &Value, query: &Field) {
    if let Err(mismatch) = check_fields(query.child_fields(), actual) {
        tracing::debug!(operation = query.name(), %mismatch, "response shape mismatch");
        panic!("GraphQL response for `{}` does not match: {mismatch}", query.name());
    }
}

/// Fail the current test unless `field` and its children are present in
/// `actual`.
///
/// # Panics
/// Panics with the missing field's name and location on the first mismatch.
#[allow(clippy::panic)]
pub fn assert_field_present(field: &Field, actual: &Value) {
    if let Err(mismatch) = check_field(field, actual) {
        panic!("{mismatch}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_query() -> Field {
        Field::new("users")
            .child(Field::new("id"))
            .child(Field::with_leaves("profile", ["email"]))
    }

    #[test]
    fn matches_single_record() {
        let actual = json!({"id": 1, "profile": {"email": "a@b.c", "extra": true}});
        assert_eq!(check_fields(user_query().child_fields(), &actual), Ok(()));
    }

    #[test]
    fn looks_through_lists_of_records() {
        let actual = json!([
            {"id": 1, "profile": {"email": "a"}},
            {"id": 2, "profile": {"email": "b"}}
        ]);
        assert_eq!(check_fields(user_query().child_fields(), &actual), Ok(()));
    }

    #[test]
    fn one_bad_record_in_a_list_fails_with_its_sub_field() {
        let actual = json!([
            {"id": 1, "profile": {"email": "a"}},
            {"id": 2, "profile": {"email": "b"}},
            {"id": 3, "profile": {"name": "c"}}
        ]);
        let err = check_fields(user_query().child_fields(), &actual).expect_err("mismatch");
        assert_eq!(
            err,
            ShapeMismatch::MissingField {
                field: "email".into(),
                path: "$[2].profile".into()
            }
        );
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn null_values_are_not_descended() {
        let actual = json!({"id": 1, "profile": null});
        assert_eq!(check_fields(user_query().child_fields(), &actual), Ok(()));
    }

    #[test]
    fn null_list_elements_are_skipped() {
        let actual = json!([null, {"id": 1, "profile": {"email": "a"}}]);
        assert_eq!(check_fields(user_query().child_fields(), &actual), Ok(()));
    }

    #[test]
    fn missing_key_is_reported_even_when_null_would_pass() {
        let err = check_fields(user_query().child_fields(), &json!({"id": 1})).expect_err("missing");
        assert_eq!(err.field(), "profile");
        assert_eq!(err.path(), "$");
    }

    #[test]
    fn empty_object_is_keyed_not_an_empty_list() {
        let err = check_field(&Field::new("id"), &json!({})).expect_err("missing");
        assert_eq!(
            err,
            ShapeMismatch::MissingField {
                field: "id".into(),
                path: "$".into()
            }
        );
        assert_eq!(check_field(&Field::new("id"), &json!([])), Ok(()));
    }

    #[test]
    fn scalar_where_object_expected_is_a_mismatch() {
        let err = check_fields(user_query().child_fields(), &json!({"id": 1, "profile": "x"}))
            .expect_err("scalar");
        assert_eq!(
            err,
            ShapeMismatch::NotAnObject {
                field: "email".into(),
                path: "$.profile".into(),
                found: "a string"
            }
        );
    }

    #[test]
    fn leaf_holding_a_list_passes() {
        let field = Field::new("tags");
        assert_eq!(check_field(&field, &json!({"tags": ["a", "b"]})), Ok(()));
    }

    #[test]
    fn nested_lists_are_unwrapped() {
        let field = Field::with_leaves("matrix", ["v"]);
        let actual = json!({"matrix": [[{"v": 1}], [{"v": 2}, {"w": 3}]]});
        let err = check_field(&field, &actual).expect_err("mismatch");
        assert_eq!(err.path(), "$.matrix[1][1]");
    }

    #[test]
    fn assert_graphql_fields_passes_for_matching_payload() {
        assert_graphql_fields(&json!({"id": 1, "profile": {"email": "e"}}), &user_query());
    }

    #[test]
    #[should_panic(expected = "expected field `email` is missing")]
    fn assert_graphql_fields_panics_with_field_name() {
        assert_graphql_fields(&json!([{"id": 1, "profile": {}}]), &user_query());
    }

    #[test]
    #[should_panic(expected = "`id` is missing")]
    fn assert_field_present_panics() {
        assert_field_present(&Field::new("id"), &json!({"name": "x"}));
    }
}
