//! Composable value schemas: validation, defaults, JSON Schema export.
//!
//! A schema is a tagged tree (primitive, object, array, enum, optional,
//! record, nullable) with one recursive validator. Validation is total: any
//! JSON value is either accepted (with defaults filled in) or rejected with
//! one field error per offending field.

mod errors;
mod json_schema;
mod types;

pub use errors::{Constraint, FieldError, ValidationErrors};
pub use types::{Field, Schema, StringFormat};

pub(crate) use types::value_type_name;
