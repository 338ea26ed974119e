//! Core types for the integration.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Runtime configuration and integration credentials

mod config;
mod errors;

pub use config::{Config, HttpConfig, IntegrationConfig, ObservabilityConfig};
pub use errors::{Error, Result};
