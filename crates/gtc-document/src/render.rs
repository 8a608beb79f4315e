//! Rendering field trees into GraphQL document text.
//!
//! Output layout is fixed so that rendered documents can be snapshotted:
//!
//! - a field is its name, then `(args)` if it has any, then a space, then
//!   `{child\nchild\n}` if it has children;
//! - keyed argument entries are written `key : value`;
//! - every argument value is followed by a single space, lists are wrapped in
//!   `[ ... ] ` and input objects in `{ ... } `;
//! - variables are written `$name` and collected into a [`VariableSet`] that is
//!   returned with the document.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::argument::{ArgumentValue, Variable};
use crate::field::Field;

/// Placeholder used in error messages for the operation root.
const ROOT_PATH: &str = "<operation>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// Errors from rendering a field tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("field name must not be empty (under `{parent}`)")]
    EmptyFieldName { parent: String },

    #[error("variable referenced by `{field}` has an empty name")]
    EmptyVariableName { field: String },

    #[error("variable `${name}` is bound to conflicting types or values ({first} vs {second})")]
    ConflictingVariable {
        name: String,
        first: String,
        second: String,
    },
}

/// Variables referenced by one document, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    entries: IndexMap<String, Variable>,
}

impl VariableSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference to `variable`.
    ///
    /// Referencing the same variable again is a no-op; referencing a different
    /// variable under an existing name is an error.
    ///
    /// # Errors
    /// Returns [`RenderError::EmptyVariableName`] or
    /// [`RenderError::ConflictingVariable`].
    pub fn register(&mut self, variable: &Variable, field: &str) -> Result<(), RenderError> {
        if variable.name().is_empty() {
            return Err(RenderError::EmptyVariableName {
                field: field.to_string(),
            });
        }

        match self.entries.get(variable.name()) {
            Some(existing) if existing != variable => Err(RenderError::ConflictingVariable {
                name: variable.name().to_string(),
                first: describe(existing),
                second: describe(variable),
            }),
            Some(_) => Ok(()),
            None => {
                self.entries
                    .insert(variable.name().to_string(), variable.clone());
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.entries.values()
    }

    /// Operation-level declarations, e.g. `($id: ID!, $limit: Int)`.
    /// Empty when no variables were referenced.
    #[must_use]
    pub fn header(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let declarations = self
            .iter()
            .map(|v| format!("${}: {}", v.name(), v.type_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("({declarations})")
    }

    /// The `variables` map sent next to the document.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|v| (v.name().to_string(), v.value().clone()))
            .collect()
    }
}

fn describe(variable: &Variable) -> String {
    format!("{}: {} = {}", variable.name(), variable.type_name(), variable.value())
}

/// A rendered operation: the request payload `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    query: String,
    variables: Option<Map<String, Value>>,
}

impl Document {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn variables(&self) -> Option<&Map<String, Value>> {
        self.variables.as_ref()
    }

    /// The payload as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("query".into(), Value::String(self.query.clone()));
        payload.insert(
            "variables".into(),
            self.variables.clone().map_or(Value::Null, Value::Object),
        );
        Value::Object(payload)
    }
}

/// Render `root` as `query { ... }`.
///
/// Queries never declare variables and always send `variables: null`.
/// Variable references are still checked for empty or conflicting names.
///
/// # Errors
/// See [`RenderError`].
pub fn render_query(root: &Field) -> Result<Document, RenderError> {
    render(root, OperationKind::Query)
}

/// Render `root` as `mutation (...) { ... }` with its variables map.
///
/// # Errors
/// See [`RenderError`].
pub fn render_mutation(root: &Field) -> Result<Document, RenderError> {
    render(root, OperationKind::Mutation)
}

/// Render `root` as an operation of the given kind.
///
/// # Errors
/// See [`RenderError`].
pub fn render(root: &Field, kind: OperationKind) -> Result<Document, RenderError> {
    let mut variables = VariableSet::new();
    let body = selection(root, ROOT_PATH, &mut variables)?;

    let document = match kind {
        OperationKind::Query => Document {
            query: format!("query {{ {body} }}"),
            variables: None,
        },
        OperationKind::Mutation => Document {
            query: format!("mutation {} {{ {body} }}", variables.header()),
            variables: Some(variables.to_json()),
        },
    };

    tracing::debug!(
        operation = %kind,
        root = root.name(),
        variables = variables.len(),
        "rendered GraphQL document"
    );
    Ok(document)
}

/// Selection text for one field and its descendants. `parent` is the dotted
/// path used in error messages, or [`ROOT_PATH`] for the operation root.
fn selection(
    field: &Field,
    parent: &str,
    variables: &mut VariableSet,
) -> Result<String, RenderError> {
    if field.name().is_empty() {
        return Err(RenderError::EmptyFieldName {
            parent: parent.to_string(),
        });
    }
    let path = if parent == ROOT_PATH {
        field.name().to_string()
    } else {
        format!("{parent}.{}", field.name())
    };

    let mut out = String::from(field.name());

    let args = entries(field.arguments(), &path, variables)?;
    if !args.is_empty() {
        out.push('(');
        out.push_str(&args);
        out.push(')');
    }
    out.push(' ');

    if !field.is_leaf() {
        out.push('{');
        for child in field.child_fields() {
            out.push_str(&selection(child, &path, variables)?);
            out.push('\n');
        }
        out.push('}');
    }

    Ok(out)
}

/// Text for keyed entries: field arguments or input object members.
fn entries<'a>(
    members: impl IntoIterator<Item = (&'a String, &'a ArgumentValue)>,
    path: &str,
    variables: &mut VariableSet,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for (key, value) in members {
        out.push_str(key);
        out.push_str(" : ");
        out.push_str(&argument(value, path, variables)?);
    }
    Ok(out)
}

fn argument(
    value: &ArgumentValue,
    path: &str,
    variables: &mut VariableSet,
) -> Result<String, RenderError> {
    Ok(match value {
        ArgumentValue::Scalar(scalar) => format!("{scalar} "),
        ArgumentValue::List(items) => {
            let mut inner = String::new();
            for item in items {
                inner.push_str(&argument(item, path, variables)?);
            }
            format!("[ {inner} ] ")
        }
        ArgumentValue::Object(members) => {
            format!("{{ {} }} ", entries(members, path, variables)?)
        }
        ArgumentValue::Variable(variable) => {
            variables.register(variable, path)?;
            format!("${} ", variable.name())
        }
    })
}
