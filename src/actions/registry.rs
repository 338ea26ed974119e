//! Action registry: immutable name → contract map.
//!
//! Built once at startup, then shared behind an `Arc` and read without locks.

use super::catalog;
use super::contract::ActionContract;
use crate::types::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Name-keyed collection of action contracts.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    entries: HashMap<String, ActionContract>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every Zendesk catalog action.
    pub fn zendesk() -> Result<Self> {
        let mut registry = Self::new();
        for contract in catalog::all() {
            registry.register(contract)?;
        }
        tracing::debug!(actions = registry.len(), "Built zendesk action registry");
        Ok(registry)
    }

    /// Register a contract. Names are unique; the contract must be well-formed.
    pub fn register(&mut self, contract: ActionContract) -> Result<()> {
        contract.check()?;
        if self.entries.contains_key(&contract.name) {
            return Err(Error::duplicate_action(contract.name));
        }
        tracing::debug!(action = %contract.name, "Registered action");
        self.entries.insert(contract.name.clone(), contract);
        Ok(())
    }

    /// Contract for `name`, or [`Error::UnknownAction`].
    pub fn lookup(&self, name: &str) -> Result<&ActionContract> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::unknown_action(name))
    }

    pub fn get(&self, name: &str) -> Option<&ActionContract> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All action names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// All contracts, sorted by name.
    pub fn contracts(&self) -> Vec<&ActionContract> {
        let mut contracts: Vec<&ActionContract> = self.entries.values().collect();
        contracts.sort_by(|a, b| a.name.cmp(&b.name));
        contracts
    }

    /// Validate caller input, returning it with defaults applied.
    pub fn validate_input(&self, name: &str, input: &Value) -> Result<Value> {
        let contract = self.lookup(name)?;
        contract.input_schema.validate(input).map_err(|errors| {
            tracing::warn!(action = name, errors = %errors, "Rejected action input");
            Error::Validation(errors)
        })
    }

    /// Validate a handler result against the output schema.
    pub fn validate_output(&self, name: &str, output: &Value) -> Result<Value> {
        let contract = self.lookup(name)?;
        contract.output_schema.validate(output).map_err(|errors| {
            tracing::warn!(action = name, errors = %errors, "Rejected action output");
            Error::Validation(errors)
        })
    }

    /// Host-facing catalog keyed by action name.
    pub fn describe(&self) -> Value {
        let actions: serde_json::Map<String, Value> = self
            .contracts()
            .into_iter()
            .map(|c| (c.name.clone(), c.describe()))
            .collect();
        json!(actions)
    }

    /// One signature line per action, sorted by name.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(self.len() + 1);
        lines.push("Available actions:".to_string());
        for contract in self.contracts() {
            lines.push(contract.signature());
        }
        lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Schema};

    fn sample_contract() -> ActionContract {
        ActionContract::new("echo", "Echo", "Echo a message back")
            .input(Schema::object([Field::new("message", Schema::string())]))
            .output(Schema::object([Field::new("message", Schema::string())]))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ActionRegistry::new();
        registry.register(sample_contract()).unwrap();

        assert!(registry.contains("echo"));
        assert_eq!(registry.lookup("echo").unwrap(), &sample_contract());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ActionRegistry::new();
        registry.register(sample_contract()).unwrap();
        let err = registry.register(sample_contract()).unwrap_err();
        assert!(matches!(err, Error::DuplicateAction(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_malformed_fails() {
        let mut registry = ActionRegistry::new();
        let contract = sample_contract().ui_hint("missing", "Missing");
        assert!(matches!(
            registry.register(contract),
            Err(Error::InvalidContract(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ActionRegistry::new();
        let err = registry.lookup("nonexistent").unwrap_err();
        assert!(matches!(err, Error::UnknownAction(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_validate_input_and_output() {
        let mut registry = ActionRegistry::new();
        registry.register(sample_contract()).unwrap();

        assert!(registry.validate_input("echo", &json!({"message": "hi"})).is_ok());
        assert!(matches!(
            registry.validate_input("echo", &json!({})),
            Err(Error::Validation(_))
        ));
        assert!(registry.validate_output("echo", &json!({"message": 1})).is_err());
        assert!(matches!(
            registry.validate_input("nope", &json!({})),
            Err(Error::UnknownAction(_))
        ));
    }

    #[test]
    fn test_zendesk_registry_names() {
        let registry = ActionRegistry::zendesk().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "callApi",
                "closeTicket",
                "createTicket",
                "createUser",
                "findCustomer",
                "getTicket",
                "getTicketConversation",
                "listAgents",
                "openTicket",
                "setConversationRequester",
            ]
        );
    }

    #[test]
    fn test_summary() {
        let mut registry = ActionRegistry::new();
        assert!(registry.summary().is_empty());
        registry.register(sample_contract()).unwrap();
        assert_eq!(
            registry.summary(),
            "Available actions:\n- echo(message: string): Echo a message back"
        );
    }

    #[test]
    fn test_describe_keys() {
        let registry = ActionRegistry::zendesk().unwrap();
        let catalog = registry.describe();
        assert_eq!(catalog.as_object().map(|m| m.len()), Some(10));
        assert_eq!(catalog["findCustomer"]["input"]["schema"]["properties"]["query"]["minLength"], 2);
    }
}
