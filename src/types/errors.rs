//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Schema
//! failures and unknown actions are the caller-correctable kinds; everything
//! else belongs to registry construction or handler execution.

use crate::schema::ValidationErrors;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the integration.
#[derive(Error, Debug)]
pub enum Error {
    /// Value rejected by a contract schema. Always field-attributable.
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// No contract registered under the requested action name.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Registry build-time: action name already taken.
    #[error("duplicate action: {0}")]
    DuplicateAction(String),

    /// Registry build-time: contract is not well-formed.
    #[error("invalid contract: {0}")]
    InvalidContract(String),

    /// Handler-side failure (malformed embedded JSON, missing handler, ...).
    #[error("execution error: {0}")]
    Execution(String),

    /// HTTP transport errors from the remote call.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the invoking caller can fix this by correcting its request.
    ///
    /// Hosts surface these as client-visible errors instead of internal
    /// failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::UnknownAction(_))
    }

    /// Field-level errors, when this is a schema failure.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_action(name: impl Into<String>) -> Self {
        Self::UnknownAction(name.into())
    }

    pub fn duplicate_action(name: impl Into<String>) -> Self {
        Self::DuplicateAction(name.into())
    }

    pub fn invalid_contract(msg: impl Into<String>) -> Self {
        Self::InvalidContract(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
