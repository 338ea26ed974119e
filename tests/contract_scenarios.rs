//! Contract scenarios: registry, catalog schemas and dispatch, end to end.

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use zendesk_integration::actions::catalog::{
    self, CALL_API, CALL_API_METHODS, CLOSE_TICKET, FIND_CUSTOMER, LIST_AGENTS,
};
use zendesk_integration::definition::configuration_schema;
use zendesk_integration::schema::{Constraint, Field};
use zendesk_integration::{
    ActionContract, ActionDispatcher, ActionHandler, ActionRegistry, Error, Result, Schema,
};

fn registry() -> ActionRegistry {
    ActionRegistry::zendesk().unwrap()
}

/// Echoes a fixed ticket for any input.
struct FixedTicket;

#[async_trait]
impl ActionHandler for FixedTicket {
    async fn handle(&self, input: Value) -> Result<Value> {
        Ok(json!({
            "ticket": {
                "id": input["ticketId"].as_str().and_then(|s| s.parse::<i64>().ok()).unwrap_or(0),
                "subject": "Printer on fire",
                "description": "Smoke everywhere",
                "status": "closed",
                "priority": "urgent",
                "requesterId": 7,
                "assigneeId": 9,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-02T00:00:00Z",
                "tags": [],
                "externalId": null,
            }
        }))
    }
}

// =============================================================================
// callApi
// =============================================================================

#[test]
fn test_call_api_accepts_every_method() {
    let registry = registry();
    for method in CALL_API_METHODS {
        let input = json!({"method": method, "path": "tickets.json"});
        assert!(
            registry.validate_input(CALL_API, &input).is_ok(),
            "method {} should be accepted",
            method
        );
    }
}

#[test]
fn test_call_api_optional_fields_absent() {
    let out = registry()
        .validate_input(CALL_API, &json!({"method": "GET", "path": "users/me.json"}))
        .unwrap();
    assert_eq!(out, json!({"method": "GET", "path": "users/me.json"}));
}

#[test]
fn test_call_api_embedded_json_not_checked_by_schema() {
    let input = json!({"method": "POST", "path": "tickets.json", "requestBody": "{oops"});
    assert!(registry().validate_input(CALL_API, &input).is_ok());
}

#[test]
fn test_call_api_empty_path_rejected() {
    let err = registry()
        .validate_input(CALL_API, &json!({"method": "GET", "path": ""}))
        .unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].path, "path");
    assert_eq!(
        errors.errors()[0].constraint,
        Constraint::MinLength { min: 1, actual: 0 }
    );
}

#[test]
fn test_call_api_lowercase_method_rejected() {
    let err = registry()
        .validate_input(CALL_API, &json!({"method": "get", "path": "x"}))
        .unwrap_err();
    let field = err.field_errors().unwrap().for_path("method").cloned().unwrap();
    assert_eq!(
        field.constraint,
        Constraint::OneOf {
            allowed: CALL_API_METHODS.iter().map(|m| m.to_string()).collect()
        }
    );
}

proptest! {
    #[test]
    fn prop_call_api_rejects_unlisted_methods(method in "[A-Za-z]{0,10}") {
        prop_assume!(!CALL_API_METHODS.contains(&method.as_str()));
        let input = json!({"method": method, "path": "tickets.json"});
        let err = registry().validate_input(CALL_API, &input).unwrap_err();
        let errors = err.field_errors().unwrap();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.errors()[0].path.as_str(), "method");
    }

    #[test]
    fn prop_find_customer_query_min_length(query in "\\PC{0,6}") {
        let result = registry().validate_input(FIND_CUSTOMER, &json!({"query": query}));
        if query.chars().count() >= 2 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }
}

// =============================================================================
// Catalog actions
// =============================================================================

#[test]
fn test_find_customer_boundary() {
    let registry = registry();
    assert!(registry.validate_input(FIND_CUSTOMER, &json!({"query": "j"})).is_err());
    assert!(registry.validate_input(FIND_CUSTOMER, &json!({"query": "jo"})).is_ok());
}

#[test]
fn test_list_agents_defaults_is_online() {
    let out = registry().validate_input(LIST_AGENTS, &json!({})).unwrap();
    assert_eq!(out["isOnline"], json!(true));
}

#[test]
fn test_close_ticket_scenario() {
    let registry = registry();
    assert!(registry
        .validate_input(CLOSE_TICKET, &json!({"ticketId": "42"}))
        .is_ok());

    let err = registry
        .validate_input(CLOSE_TICKET, &json!({"comment": "done"}))
        .unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].path, "ticketId");
    assert_eq!(errors.errors()[0].constraint, Constraint::Required);
}

#[test]
fn test_configuration_schema() {
    let schema = configuration_schema();
    assert!(schema
        .validate(&json!({
            "organizationSubdomain": "botpress7281",
            "email": "john.doe@botpress.com",
            "apiToken": "abc123",
        }))
        .is_ok());

    let errors = schema
        .validate(&json!({
            "organizationSubdomain": "botpress7281",
            "email": "john.doe.botpress.com",
            "apiToken": "abc123",
        }))
        .unwrap_err();
    assert_eq!(errors.errors()[0].path, "email");
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_registry_round_trip_and_duplicates() {
    let contract = ActionContract::new("reopenTicket", "Reopen ticket", "Reopen a solved ticket")
        .input(Schema::object([Field::new("ticketId", Schema::string())]))
        .ui_hint("ticketId", "Ticket ID");

    let mut registry = registry();
    registry.register(contract.clone()).unwrap();
    assert_eq!(registry.lookup(&contract.name).unwrap(), &contract);

    let err = registry.register(contract).unwrap_err();
    assert!(matches!(err, Error::DuplicateAction(_)));
}

#[test]
fn test_registering_catalog_twice_fails() {
    let mut registry = registry();
    let err = registry.register(catalog::get_ticket()).unwrap_err();
    assert!(matches!(err, Error::DuplicateAction(name) if name == "getTicket"));
}

#[test]
fn test_shared_registry_concurrent_reads() {
    let registry = Arc::new(registry());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .validate_input(CLOSE_TICKET, &json!({"ticketId": "1"}))
                    .is_ok()
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().unwrap());
    }
}

// =============================================================================
// Exported JSON Schema agrees with the native validator
// =============================================================================

#[test]
fn test_exported_input_schemas_agree() {
    let registry = registry();
    let samples = [
        (CLOSE_TICKET, json!({"ticketId": "42"})),
        (CLOSE_TICKET, json!({"comment": "done"})),
        (CLOSE_TICKET, json!({"ticketId": 42})),
        (FIND_CUSTOMER, json!({"query": "j"})),
        (FIND_CUSTOMER, json!({"query": "jo"})),
        (LIST_AGENTS, json!({})),
        (LIST_AGENTS, json!({"isOnline": "yes"})),
        (CALL_API, json!({"method": "FETCH", "path": "x"})),
        (CALL_API, json!({"method": "GET", "path": "x", "params": "{}"})),
        (CALL_API, json!({"method": "GET", "path": ""})),
    ];

    for (action, input) in samples {
        let contract = registry.lookup(action).unwrap();
        let exported = contract.input_schema.to_json_schema();
        let validator = jsonschema::validator_for(&exported).unwrap();
        assert_eq!(
            validator.is_valid(&input),
            contract.input_schema.validate(&input).is_ok(),
            "{} disagreed on {}",
            action,
            input
        );
    }
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn test_dispatch_close_ticket() {
    let mut dispatcher = ActionDispatcher::new(Arc::new(registry()));
    dispatcher
        .register_handler(CLOSE_TICKET, Arc::new(FixedTicket))
        .unwrap();

    let output = dispatcher
        .dispatch(CLOSE_TICKET, json!({"ticketId": "42"}))
        .await
        .unwrap();
    assert_eq!(output["ticket"]["id"], json!(42));
    assert_eq!(output["ticket"]["status"], json!("closed"));
}

#[tokio::test]
#[tracing_test::traced_test]
async fn test_rejected_input_is_logged() {
    let mut dispatcher = ActionDispatcher::new(Arc::new(registry()));
    dispatcher
        .register_handler(CLOSE_TICKET, Arc::new(FixedTicket))
        .unwrap();

    let err = dispatcher
        .dispatch(CLOSE_TICKET, json!({"comment": "done"}))
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(logs_contain("Rejected action input"));
}
