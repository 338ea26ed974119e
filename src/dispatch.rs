//! Action dispatch: lookup, validate, execute, validate.
//!
//! The dispatcher holds a shared handle to the read-only registry and a
//! handler per action name. Input is checked before a handler ever runs, and
//! handler output is checked against the contract before it reaches the
//! caller.

use crate::actions::ActionRegistry;
use crate::types::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Executes one action. Receives input that already passed the input schema.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, input: Value) -> Result<Value>;
}

/// Routes invocations to handlers through the contract checks.
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Attach a handler to a registered action. One handler per action.
    pub fn register_handler(
        &mut self,
        action: &str,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<()> {
        self.registry.lookup(action)?;
        if self.handlers.contains_key(action) {
            return Err(Error::duplicate_action(format!(
                "handler already registered: {}",
                action
            )));
        }
        self.handlers.insert(action.to_string(), handler);
        tracing::debug!(action, "Registered action handler");
        Ok(())
    }

    pub fn has_handler(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Invoke `action` with caller-supplied `input`.
    pub async fn dispatch(&self, action: &str, input: Value) -> Result<Value> {
        let normalized = self.registry.validate_input(action, &input)?;

        let handler = self.handlers.get(action).ok_or_else(|| {
            Error::execution(format!("no handler registered for action: {}", action))
        })?;

        tracing::debug!(action, "Dispatching action");
        let output = handler.handle(normalized).await?;

        self.registry.validate_output(action, &output)
    }
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("ActionDispatcher")
            .field("actions", &self.registry.len())
            .field("handlers", &handlers)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::catalog::{CLOSE_TICKET, LIST_AGENTS, SET_CONVERSATION_REQUESTER};
    use serde_json::json;

    fn dispatcher() -> ActionDispatcher {
        ActionDispatcher::new(Arc::new(ActionRegistry::zendesk().unwrap()))
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let err = dispatcher().dispatch("reopenTicket", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::UnknownAction(name) if name == "reopenTicket"));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_handler() {
        let mut handler = MockActionHandler::new();
        handler.expect_handle().times(0);

        let mut dispatcher = dispatcher();
        dispatcher
            .register_handler(CLOSE_TICKET, Arc::new(handler))
            .unwrap();

        let err = dispatcher
            .dispatch(CLOSE_TICKET, json!({"comment": "done"}))
            .await
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.errors()[0].path, "ticketId");
    }

    #[tokio::test]
    async fn test_handler_receives_defaulted_input() {
        let mut handler = MockActionHandler::new();
        handler
            .expect_handle()
            .withf(|input| input == &json!({"isOnline": true}))
            .times(1)
            .returning(|_| Ok(json!({"agents": []})));

        let mut dispatcher = dispatcher();
        dispatcher.register_handler(LIST_AGENTS, Arc::new(handler)).unwrap();

        let output = dispatcher.dispatch(LIST_AGENTS, json!({})).await.unwrap();
        assert_eq!(output, json!({"agents": []}));
    }

    #[tokio::test]
    async fn test_invalid_output_rejected() {
        let mut handler = MockActionHandler::new();
        handler
            .expect_handle()
            .returning(|_| Ok(json!({"agents": "nobody"})));

        let mut dispatcher = dispatcher();
        dispatcher.register_handler(LIST_AGENTS, Arc::new(handler)).unwrap();

        let err = dispatcher.dispatch(LIST_AGENTS, json!({})).await.unwrap_err();
        assert_eq!(err.field_errors().unwrap().errors()[0].path, "agents");
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let mut handler = MockActionHandler::new();
        handler
            .expect_handle()
            .returning(|_| Err(Error::execution("zendesk unavailable")));

        let mut dispatcher = dispatcher();
        dispatcher
            .register_handler(SET_CONVERSATION_REQUESTER, Arc::new(handler))
            .unwrap();

        let err = dispatcher
            .dispatch(
                SET_CONVERSATION_REQUESTER,
                json!({"conversationId": "c1", "requesterId": "r1"}),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
    }

    #[tokio::test]
    async fn test_missing_handler() {
        let err = dispatcher()
            .dispatch(CLOSE_TICKET, json!({"ticketId": "42"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution(msg) if msg.contains(CLOSE_TICKET)));
    }

    #[test]
    fn test_register_handler_rules() {
        let mut dispatcher = dispatcher();
        assert!(matches!(
            dispatcher.register_handler("nope", Arc::new(MockActionHandler::new())),
            Err(Error::UnknownAction(_))
        ));

        dispatcher
            .register_handler(CLOSE_TICKET, Arc::new(MockActionHandler::new()))
            .unwrap();
        assert!(dispatcher.has_handler(CLOSE_TICKET));
        assert!(matches!(
            dispatcher.register_handler(CLOSE_TICKET, Arc::new(MockActionHandler::new())),
            Err(Error::DuplicateAction(_))
        ));
    }
}
