//! zendesk-actions - command-line front end for the action catalog.
//!
//! - `list`: one signature line per action
//! - `describe [ACTION]`: JSON rendering of the definition or one action
//! - `validate ACTION INPUT`: schema-check an input document
//! - `call`: run a callApi passthrough using credentials from the environment

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use zendesk_integration::actions::catalog::{CALL_API, CALL_API_METHODS};
use zendesk_integration::{
    ActionDispatcher, Config, Error, IntegrationConfig, IntegrationDefinition, ZendeskClient,
};

#[derive(Debug, Parser)]
#[command(name = "zendesk-actions", version, about = "Zendesk integration action catalog")]
struct Cli {
    /// Runtime configuration file (JSON).
    #[arg(long, env = "ZENDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every registered action.
    List,
    /// Print the integration definition, or a single action, as JSON.
    Describe { action: Option<String> },
    /// Validate an input document against an action's input schema.
    Validate {
        action: String,
        /// Input as a JSON object.
        input: String,
    },
    /// Call the Zendesk API through the callApi action.
    Call {
        #[arg(long, value_parser = CALL_API_METHODS)]
        method: String,
        #[arg(long)]
        path: String,
        /// Headers (JSON object).
        #[arg(long)]
        headers: Option<String>,
        /// Query params (JSON object).
        #[arg(long)]
        params: Option<String>,
        /// Request body (JSON).
        #[arg(long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize observability
    zendesk_integration::observability::init_tracing(&config.observability);

    let definition = IntegrationDefinition::zendesk()?;

    match cli.command {
        Command::List => {
            println!("{}", definition.actions.summary());
        }
        Command::Describe { action: None } => {
            println!("{}", serde_json::to_string_pretty(&definition.describe())?);
        }
        Command::Describe {
            action: Some(action),
        } => {
            let contract = definition.actions.lookup(&action)?;
            println!("{}", serde_json::to_string_pretty(&contract.describe())?);
        }
        Command::Validate { action, input } => {
            let input: Value = serde_json::from_str(&input)?;
            match definition.actions.validate_input(&action, &input) {
                Ok(normalized) => println!("{}", serde_json::to_string_pretty(&normalized)?),
                Err(Error::Validation(errors)) => {
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Call {
            method,
            path,
            headers,
            params,
            body,
        } => {
            let credentials = IntegrationConfig::from_env()?;
            let client = ZendeskClient::new(&credentials, &config.http)?;

            let mut dispatcher = ActionDispatcher::new(Arc::clone(&definition.actions));
            dispatcher.register_handler(CALL_API, Arc::new(client))?;

            let mut input = json!({ "method": method, "path": path });
            if let Some(headers) = headers {
                input["headers"] = json!(headers);
            }
            if let Some(params) = params {
                input["params"] = json!(params);
            }
            if let Some(body) = body {
                input["requestBody"] = json!(body);
            }

            let output = dispatcher.dispatch(CALL_API, input).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
