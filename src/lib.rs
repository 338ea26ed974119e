//! # Zendesk Integration - Action Contracts and callApi Passthrough
//!
//! Declarative definition of a Zendesk helpdesk integration:
//! - Configuration schema for setup credentials (subdomain, email, API token)
//! - Integration-scoped state slots and user identity tags
//! - A name-keyed registry of schema-validated action contracts
//! - A generic `callApi` passthrough executed against the Zendesk REST API
//!
//! ## Architecture
//!
//! ```text
//!   host invocation ─► ActionDispatcher ─► ActionRegistry::validate_input
//!                            │
//!                            ▼
//!                      ActionHandler (e.g. ZendeskClient for callApi)
//!                            │
//!                            ▼
//!                   ActionRegistry::validate_output ─► caller
//! ```
//!
//! The registry is built once, wrapped in an `Arc`, and never mutated.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod actions;
pub mod client;
pub mod definition;
pub mod dispatch;
pub mod schema;
pub mod types;

// Internal utilities
pub mod observability;

pub use actions::{ActionContract, ActionRegistry, RemoteCallRequest, RemoteCallResponse};
pub use client::ZendeskClient;
pub use definition::IntegrationDefinition;
pub use dispatch::{ActionDispatcher, ActionHandler};
pub use schema::{FieldError, Schema, ValidationErrors};
pub use types::{Config, Error, IntegrationConfig, Result};
