//! Normalized operation results.

use gtc_document::Field;
use serde::Serialize;
use serde_json::Value;

use crate::shape;

/// The result of one operation.
///
/// `data` is the value found under the operation's name in the response's
/// `data` object. `errors` is present only when the response had an `errors`
/// key, even if that list was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseData {
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<Value>>,
}

impl ResponseData {
    /// A response without an `errors` key.
    #[must_use]
    pub const fn new(data: Option<Value>) -> Self {
        Self { data, errors: None }
    }

    /// A response that carried an `errors` key.
    #[must_use]
    pub const fn with_errors(data: Option<Value>, errors: Vec<Value>) -> Self {
        Self {
            data,
            errors: Some(errors),
        }
    }

    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        self.data
    }

    /// The error list, if the response had one.
    #[must_use]
    pub fn errors(&self) -> Option<&[Value]> {
        self.errors.as_deref()
    }

    /// True when at least one error object was returned.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// The `message` of every error object that has one.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors()
            .unwrap_or_default()
            .iter()
            .filter_map(|error| error.get("message").and_then(Value::as_str))
            .collect()
    }

    /// Fail the current test if any error object was returned.
    #[allow(clippy::panic)]
    pub fn assert_no_errors(&self) {
        if self.has_errors() {
            panic!(
                "Expected no GraphQL errors, but got: {:?}",
                self.errors().unwrap_or_default()
            );
        }
    }

    /// Fail the current test unless `data` contains every field selected by
    /// `query`.
    pub fn assert_fields(&self, query: &Field) {
        shape::assert_graphql_fields(self.data.as_ref().unwrap_or(&Value::Null), query);
    }
}

/// Normalize a raw transport response for the operation named
/// `operation_name`.
///
/// A missing `data` object, a missing entry, or a `null` entry all yield no
/// data. The presence of an `errors` key, not its length, selects the
/// errors-carrying form.
#[must_use]
pub fn compose_response(mut raw: Value, operation_name: &str) -> ResponseData {
    let data = raw
        .get_mut("data")
        .and_then(|data| data.get_mut(operation_name))
        .map(Value::take)
        .filter(|value| !value.is_null());

    let Some(errors) = raw.as_object_mut().and_then(|obj| obj.remove("errors")) else {
        return ResponseData::new(data);
    };

    let errors = match errors {
        Value::Array(errors) => errors,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    if !errors.is_empty() {
        tracing::info!(
            operation = operation_name,
            errors = errors.len(),
            "GraphQL response carried errors"
        );
    }
    ResponseData::with_errors(data, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_data_under_operation_name() {
        let response = compose_response(
            json!({"data": {"user": {"id": "1"}, "other": 2}}),
            "user",
        );
        assert_eq!(response.data(), Some(&json!({"id": "1"})));
        assert!(response.errors().is_none());
        assert!(!response.has_errors());
    }

    #[test]
    fn missing_data_without_errors_is_plain_form() {
        let response = compose_response(json!({}), "user");
        assert_eq!(response, ResponseData::new(None));

        let response = compose_response(json!({"data": null}), "user");
        assert_eq!(response, ResponseData::new(None));

        let response = compose_response(json!({"data": {"user": null}}), "user");
        assert_eq!(response, ResponseData::new(None));
    }

    #[test]
    fn empty_errors_list_still_selects_errors_form() {
        let response = compose_response(json!({"data": {"user": 1}, "errors": []}), "user");
        assert_eq!(response, ResponseData::with_errors(Some(json!(1)), vec![]));
        assert!(response.errors().is_some());
        assert!(!response.has_errors());
    }

    #[test]
    fn errors_are_kept_with_partial_data() {
        let response = compose_response(
            json!({
                "data": {"user": null},
                "errors": [
                    {"message": "not found", "path": ["user"]},
                    {"extensions": {"code": "X"}}
                ]
            }),
            "user",
        );
        assert!(response.data().is_none());
        assert!(response.has_errors());
        assert_eq!(response.errors().map(<[Value]>::len), Some(2));
        assert_eq!(response.error_messages(), ["not found"]);
    }

    #[test]
    fn non_list_errors_are_normalized() {
        let response = compose_response(json!({"errors": null}), "user");
        assert_eq!(response.errors(), Some(&[][..]));

        let response = compose_response(json!({"errors": {"message": "boom"}}), "user");
        assert_eq!(response.error_messages(), ["boom"]);
    }

    #[test]
    #[should_panic(expected = "Expected no GraphQL errors")]
    fn assert_no_errors_panics_on_errors() {
        compose_response(json!({"errors": [{"message": "boom"}]}), "x").assert_no_errors();
    }

    #[test]
    fn assert_fields_accepts_matching_data() {
        let response = compose_response(json!({"data": {"user": {"id": "1", "name": "Ada"}}}), "user");
        response.assert_no_errors();
        response.assert_fields(&Field::with_leaves("user", ["id", "name"]));
    }

    #[test]
    fn serializes_without_absent_errors() {
        let response = ResponseData::new(Some(json!({"id": 1})));
        assert_eq!(
            serde_json::to_value(&response).expect("serialize"),
            json!({"data": {"id": 1}})
        );
    }
}
