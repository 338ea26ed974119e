//! Field-level validation errors.

use super::types::StringFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The constraint a value failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Required field absent.
    Required,
    /// Wrong JSON type.
    Type { expected: String, actual: String },
    /// String shorter than the minimum (counted in characters).
    MinLength { min: usize, actual: usize },
    /// String does not match the named format.
    Format { format: StringFormat },
    /// Value is not one of the allowed literals.
    OneOf { allowed: Vec<String> },
}

/// One offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted/bracketed path from the validated root (`$` for the root itself).
    pub path: String,
    pub constraint: Constraint,
    pub message: String,
}

impl FieldError {
    pub fn missing(path: &str) -> Self {
        Self {
            path: display_path(path),
            constraint: Constraint::Required,
            message: "required field is missing".to_string(),
        }
    }

    pub fn type_mismatch(path: &str, expected: &str, actual: &str) -> Self {
        Self {
            path: display_path(path),
            constraint: Constraint::Type {
                expected: expected.to_string(),
                actual: actual.to_string(),
            },
            message: format!("expected {}, got {}", expected, actual),
        }
    }

    pub fn min_length(path: &str, min: usize, actual: usize) -> Self {
        Self {
            path: display_path(path),
            constraint: Constraint::MinLength { min, actual },
            message: format!(
                "must contain at least {} character(s), got {}",
                min, actual
            ),
        }
    }

    pub fn format(path: &str, format: StringFormat) -> Self {
        Self {
            path: display_path(path),
            constraint: Constraint::Format { format },
            message: format!("invalid {}", format),
        }
    }

    pub fn one_of(path: &str, allowed: &[String], actual: &str) -> Self {
        Self {
            path: display_path(path),
            constraint: Constraint::OneOf {
                allowed: allowed.to_vec(),
            },
            message: format!(
                "invalid enum value '{}', expected one of: {}",
                actual,
                allowed.join(", ")
            ),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

/// Non-empty list of field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", joined(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First error reported for `path`, if any.
    pub fn for_path(&self, path: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.path == path)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
