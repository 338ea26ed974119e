//! Action infrastructure: contracts, registry, catalog, callApi payloads.
//!
//! The registry owns contract *metadata* only. Execution lives behind
//! [`crate::dispatch::ActionHandler`].

pub mod call_api;
pub mod catalog;
pub mod contract;
pub mod registry;

pub use call_api::{HttpMethod, RemoteCallRequest, RemoteCallResponse};
pub use contract::{ActionContract, UiHint};
pub use registry::ActionRegistry;
