//! Configuration structures.
//!
//! Runtime configuration is loaded from JSON files with serde defaults.
//! Integration credentials come from the host (or the environment) and are
//! validated against the integration's configuration schema.

use crate::definition::configuration_schema;
use crate::types::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Global runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Outbound HTTP configuration.
    #[serde(default)]
    pub http: HttpConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> crate::types::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// JSON Schema describing this configuration.
    pub fn json_schema() -> crate::types::Result<Value> {
        Ok(serde_json::to_value(schemars::schema_for!(Config))?)
    }
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout for remote calls.
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("zendesk-integration/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

// =============================================================================
// Integration credentials
// =============================================================================

/// Per-instance integration setup, as injected by the host.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    /// Zendesk organization subdomain, e.g. `botpress7281`.
    pub organization_subdomain: String,
    /// Zendesk account email.
    pub email: String,
    pub api_token: String,
}

impl IntegrationConfig {
    /// Validate against the configuration schema, then decode.
    pub fn from_value(value: &Value) -> crate::types::Result<Self> {
        let normalized = configuration_schema().validate(value)?;
        Ok(serde_json::from_value(normalized)?)
    }

    /// Read `ZENDESK_SUBDOMAIN`, `ZENDESK_EMAIL` and `ZENDESK_API_TOKEN`.
    pub fn from_env() -> crate::types::Result<Self> {
        let var = |key: &str| {
            std::env::var(key).map_err(|_| Error::execution(format!("{} is not set", key)))
        };
        let value = serde_json::json!({
            "organizationSubdomain": var("ZENDESK_SUBDOMAIN")?,
            "email": var("ZENDESK_EMAIL")?,
            "apiToken": var("ZENDESK_API_TOKEN")?,
        });
        Self::from_value(&value)
    }

    /// `https://<subdomain>.zendesk.com/api/v2/`
    pub fn base_url(&self) -> String {
        format!(
            "https://{}.zendesk.com/api/v2/",
            self.organization_subdomain
        )
    }
}

impl fmt::Debug for IntegrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationConfig")
            .field("organization_subdomain", &self.organization_subdomain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
