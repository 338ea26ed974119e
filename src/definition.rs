//! Integration definition: configuration, states, user and actions.
//!
//! This is the surface the host consumes. Events and channels are owned by
//! the host and are not modeled here.

use crate::actions::ActionRegistry;
use crate::schema::{Field, Schema};
use crate::types::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the integration-scoped webhook subscription state slot.
pub const SUBSCRIPTION_INFO_STATE: &str = "subscriptionInfo";

/// Setup credentials: subdomain, account email and API token.
pub fn configuration_schema() -> Schema {
    Schema::object([
        Field::new("organizationSubdomain", Schema::string().min_length(1))
            .describe("Your zendesk organization subdomain. e.g. botpress7281"),
        Field::new("email", Schema::email())
            .describe("Your zendesk account email. e.g. john.doe@botpress.com"),
        Field::new("apiToken", Schema::string().min_length(1)).describe("Zendesk API Token"),
    ])
}

// =============================================================================
// States
// =============================================================================

/// Storage scope of a state slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateScope {
    /// One value per integration instance.
    Integration,
    Conversation,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    #[serde(rename = "type")]
    pub scope: StateScope,
    pub schema: Schema,
}

/// Typed value of the `subscriptionInfo` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub subscription_id: String,
    pub trigger_ids: Vec<String>,
}

impl SubscriptionInfo {
    pub fn schema() -> Schema {
        Schema::object([
            Field::new("subscriptionId", Schema::string()),
            Field::new("triggerIds", Schema::array(Schema::string())),
        ])
    }

    /// Validate a stored value, then decode it.
    pub fn from_value(value: &Value) -> Result<Self> {
        let normalized = Self::schema().validate(value)?;
        Ok(serde_json::from_value(normalized)?)
    }
}

pub fn states() -> BTreeMap<String, StateDefinition> {
    let mut states = BTreeMap::new();
    states.insert(
        SUBSCRIPTION_INFO_STATE.to_string(),
        StateDefinition {
            scope: StateScope::Integration,
            schema: SubscriptionInfo::schema(),
        },
    );
    states
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreation {
    pub enabled: bool,
    pub required_tags: Vec<String>,
}

/// Identity tags the host recognizes on users, plus auto-creation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefinition {
    pub tags: Vec<String>,
    pub creation: UserCreation,
}

impl UserDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

pub fn user() -> UserDefinition {
    UserDefinition {
        tags: ["id", "name", "email", "role"]
            .into_iter()
            .map(String::from)
            .collect(),
        creation: UserCreation {
            enabled: true,
            required_tags: Vec::new(),
        },
    }
}

// =============================================================================
// Integration definition
// =============================================================================

/// Everything the host needs to expose the integration.
#[derive(Debug, Clone)]
pub struct IntegrationDefinition {
    pub configuration: Schema,
    pub states: BTreeMap<String, StateDefinition>,
    pub user: UserDefinition,
    pub actions: Arc<ActionRegistry>,
}

impl IntegrationDefinition {
    pub fn zendesk() -> Result<Self> {
        Ok(Self {
            configuration: configuration_schema(),
            states: states(),
            user: user(),
            actions: Arc::new(ActionRegistry::zendesk()?),
        })
    }

    /// Host-facing JSON rendering of the whole definition.
    pub fn describe(&self) -> Value {
        let states: serde_json::Map<String, Value> = self
            .states
            .iter()
            .map(|(name, state)| {
                (
                    name.clone(),
                    json!({
                        "type": state.scope,
                        "schema": state.schema.to_json_schema(),
                    }),
                )
            })
            .collect();
        let tags: serde_json::Map<String, Value> = self
            .user
            .tags
            .iter()
            .map(|t| (t.clone(), json!({})))
            .collect();

        json!({
            "configuration": { "schema": self.configuration.to_json_schema() },
            "states": states,
            "user": {
                "tags": tags,
                "creation": self.user.creation,
            },
            "actions": self.actions.describe(),
        })
    }
}
