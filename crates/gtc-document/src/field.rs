//! Selection trees.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::argument::ArgumentValue;

/// Ordered arguments of a field.
pub type Arguments = IndexMap<String, ArgumentValue>;

/// A named selection, optionally carrying arguments and sub-selections.
///
/// The same type is used for operation roots and for nested fields: any field
/// may take arguments, and a field without children is a scalar leaf.
///
/// ```
/// use gtc_document::{Field, Variable};
///
/// let query = Field::new("user")
///     .arg("id", Variable::new("id", "ID!", "42"))
///     .child(Field::new("id"))
///     .child(Field::new("posts").arg("first", 10).child(Field::new("title")));
///
/// assert_eq!(query.child_fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    name: String,
    #[serde(default, rename = "args", skip_serializing_if = "IndexMap::is_empty")]
    arguments: Arguments,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Arguments::new(),
            children: Vec::new(),
        }
    }

    /// A field selecting the given scalar leaves, e.g. `Field::with_leaves("user", ["id", "name"])`.
    pub fn with_leaves<S, I>(name: impl Into<String>, leaves: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self::new(name).children(leaves.into_iter().map(Self::new))
    }

    /// Append a sub-selection.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several sub-selections in order.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set an argument. Re-using a key replaces its value but keeps its position.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn child_fields(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
