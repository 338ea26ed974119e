//! Zendesk action catalog.
//!
//! Field names and optionality are wire-visible to the host and must not
//! drift.

use super::contract::ActionContract;
use crate::schema::{Field, Schema};
use serde_json::json;

pub const GET_TICKET: &str = "getTicket";
pub const FIND_CUSTOMER: &str = "findCustomer";
pub const CREATE_TICKET: &str = "createTicket";
pub const CLOSE_TICKET: &str = "closeTicket";
pub const LIST_AGENTS: &str = "listAgents";
pub const GET_TICKET_CONVERSATION: &str = "getTicketConversation";
pub const SET_CONVERSATION_REQUESTER: &str = "setConversationRequester";
pub const CREATE_USER: &str = "createUser";
pub const OPEN_TICKET: &str = "openTicket";
pub const CALL_API: &str = "callApi";

/// HTTP verbs accepted by `callApi`.
pub const CALL_API_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

// =============================================================================
// Shared record shapes
// =============================================================================

/// Ticket as returned by ticket actions.
pub fn ticket_schema() -> Schema {
    Schema::object([
        Field::new("id", Schema::integer()),
        Field::new("subject", Schema::string()),
        Field::new("description", Schema::string()),
        Field::new(
            "status",
            Schema::enumeration(["new", "open", "pending", "hold", "solved", "closed"]),
        ),
        Field::new(
            "priority",
            Schema::enumeration(["low", "normal", "high", "urgent"]).nullable(),
        ),
        Field::new("requesterId", Schema::integer()),
        Field::new("assigneeId", Schema::integer().nullable()),
        Field::new("createdAt", Schema::string()),
        Field::new("updatedAt", Schema::string()),
        Field::new("tags", Schema::array(Schema::string())),
        Field::new("externalId", Schema::string().nullable()),
    ])
}

/// Zendesk user (customer or agent).
pub fn user_schema() -> Schema {
    Schema::object([
        Field::new("id", Schema::integer()),
        Field::new("name", Schema::string()),
        Field::new("email", Schema::string().nullable()),
        Field::new("role", Schema::enumeration(["end-user", "agent", "admin"])),
        Field::new("createdAt", Schema::string()),
        Field::new("updatedAt", Schema::string()),
        Field::new("externalId", Schema::string().nullable()),
        Field::new("tags", Schema::array(Schema::string())),
        Field::new("userFields", Schema::record(Schema::any())),
    ])
}

// =============================================================================
// Actions
// =============================================================================

pub fn get_ticket_conversation() -> ActionContract {
    ActionContract::new(
        GET_TICKET_CONVERSATION,
        "Get Ticket Conversation",
        "Proactively create or get a botpress conversation on a zendesk ticket",
    )
    .input(Schema::object([
        Field::new("ticketId", Schema::string()).describe("The ID of the ticket")
    ]))
    .ui_hint("ticketId", "Ticket id")
    .output(Schema::object([
        Field::new("conversationId", Schema::string()).describe("The ID of the conversation"),
        Field::new("tags", Schema::record(Schema::string()))
            .describe("The tags of the conversation"),
    ]))
}

pub fn create_ticket() -> ActionContract {
    ActionContract::new(CREATE_TICKET, "Create Ticket", "Creates a new ticket in Zendesk")
        .input(Schema::object([
            Field::new("subject", Schema::string()).describe("Subject for the ticket"),
            Field::new("comment", Schema::string()).describe("Comment for the ticket"),
            Field::new("requesterName", Schema::string()).describe("Requester name"),
            Field::new("requesterEmail", Schema::string()).describe("Requester email"),
        ]))
        .ui_hint("subject", "Ticket subject")
        .ui_hint("comment", "Ticket comment")
        .ui_hint("requesterName", "Requester name")
        .ui_hint("requesterEmail", "Requester email")
        .output(Schema::object([Field::new("ticket", ticket_schema())]))
}

pub fn get_ticket() -> ActionContract {
    ActionContract::new(GET_TICKET, "Get ticket", "Get Ticket by id.")
        .input(Schema::object([
            Field::new("ticketId", Schema::string()).describe("The ID of the ticket")
        ]))
        .ui_hint("ticketId", "Ticket id")
        .output(Schema::object([Field::new("ticket", ticket_schema())]))
}

pub fn close_ticket() -> ActionContract {
    ActionContract::new(CLOSE_TICKET, "Close ticket", "Close a ticket by its id.")
        .input(Schema::object([
            Field::new("ticketId", Schema::string()).describe("ID of the ticket to close"),
            Field::new("comment", Schema::string().optional()).describe("Closing comment"),
        ]))
        .ui_hint("ticketId", "Ticket ID")
        .ui_hint("comment", "Closing comment")
        .output(Schema::object([Field::new("ticket", ticket_schema())]))
}

pub fn find_customer() -> ActionContract {
    ActionContract::new(FIND_CUSTOMER, "Find Customer", "Find a Customer in Zendesk")
        .input(Schema::object([Field::new(
            "query",
            Schema::string().min_length(2),
        )
        .describe(
            "partial or full value of any user property, including name, email address, notes, or phone.",
        )]))
        .ui_hint("query", "Search Query")
        .output(Schema::object([Field::new(
            "customers",
            Schema::array(user_schema()),
        )]))
}

pub fn list_agents() -> ActionContract {
    ActionContract::new(LIST_AGENTS, "List Agents", "List agents")
        .input(Schema::object([Field::new(
            "isOnline",
            Schema::boolean().optional().with_default(json!(true)),
        )
        .describe("Only return agents that are currently online")]))
        .output(Schema::object([Field::new(
            "agents",
            Schema::array(user_schema()),
        )]))
}

pub fn set_conversation_requester() -> ActionContract {
    ActionContract::new(
        SET_CONVERSATION_REQUESTER,
        "Set Conversation Requester",
        "Assign a requester to a conversation. Every outgoing message in the conversation will then be sent as this requester instead of your bot.",
    )
    .input(Schema::object([
        Field::new("conversationId", Schema::string())
            .describe("The Botpress conversation Id to assign the requester to"),
        Field::new("requesterId", Schema::string())
            .describe("The Zendesk requester Id to assign to the conversation"),
    ]))
    .output(Schema::object([]))
}

pub fn create_user() -> ActionContract {
    ActionContract::new(CREATE_USER, "Create User", "Create a user in Zendesk")
        .input(Schema::object([
            Field::new("name", Schema::string().optional()),
            Field::new("pictureUrl", Schema::string().optional()),
            Field::new("email", Schema::string().optional()),
        ]))
        .output(Schema::object([Field::new("userId", Schema::string())]))
}

pub fn open_ticket() -> ActionContract {
    ActionContract::new(OPEN_TICKET, "Open Ticket", "Open a ticket in Zendesk")
        .input(Schema::object([
            Field::new("userId", Schema::string()),
            Field::new("title", Schema::string()),
            Field::new("description", Schema::string().optional()),
        ]))
        .output(Schema::object([Field::new("conversationId", Schema::string())]))
}

pub fn call_api() -> ActionContract {
    ActionContract::new(CALL_API, "Call API", "Call Zendesk API")
        .input(Schema::object([
            Field::new("method", Schema::enumeration(CALL_API_METHODS)).describe("HTTP Method"),
            Field::new("path", Schema::string().min_length(1))
                .describe("URL Path (https://<subdomain>.zendesk.com/api/v2/PATH)"),
            Field::new("headers", Schema::string().optional()).describe("Headers (JSON)"),
            Field::new("params", Schema::string().optional()).describe("Query Params (JSON)"),
            Field::new("requestBody", Schema::string().optional())
                .describe("Request Body (JSON)"),
        ]))
        .output(Schema::object([
            Field::new("status", Schema::number()),
            Field::new("headers", Schema::record(Schema::string())),
            Field::new("data", Schema::record(Schema::any())),
        ]))
}

/// Every catalog action, in declaration order.
pub fn all() -> Vec<ActionContract> {
    vec![
        get_ticket(),
        find_customer(),
        create_ticket(),
        close_ticket(),
        list_agents(),
        get_ticket_conversation(),
        set_conversation_requester(),
        create_user(),
        open_ticket(),
        call_api(),
    ]
}
