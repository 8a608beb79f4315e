//! GraphQL documents built from field trees.
//!
//! This crate has no I/O. It models selections ([`Field`]), argument values
//! ([`ArgumentValue`], [`Variable`]) and renders them into the text and
//! variables map of a query or mutation ([`render_query`], [`render_mutation`]).

mod argument;
pub use argument::{ArgumentValue, Variable, VARIABLE_KEY};

mod field;
pub use field::{Arguments, Field};

mod render;
pub use render::{
    render, render_mutation, render_query, Document, OperationKind, RenderError, VariableSet,
};
