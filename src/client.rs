//! Zendesk HTTP client: executes `callApi` passthrough requests.
//!
//! Requests go to `<base_url><path>` with the static API token carried as
//! basic credentials (`{email}/token` : `{apiToken}`). Every HTTP status,
//! including 4xx/5xx, is returned as a [`RemoteCallResponse`]; only transport
//! failures and malformed embedded JSON become errors.

use crate::actions::{RemoteCallRequest, RemoteCallResponse};
use crate::dispatch::ActionHandler;
use crate::types::{HttpConfig, IntegrationConfig, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub struct ZendeskClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl ZendeskClient {
    pub fn new(config: &IntegrationConfig, http: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(http.timeout)
            .user_agent(http.user_agent.clone())
            .build()?;

        Ok(Self {
            http: client,
            base_url: config.base_url(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Point the client at another API root (local fakes, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a relative API path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Execute one passthrough request.
    pub async fn call(&self, request: &RemoteCallRequest) -> Result<RemoteCallResponse> {
        let headers = request.parsed_headers()?;
        let params = request.parsed_params()?;
        let body = request.parsed_body()?;

        let url = self.url_for(&request.path);
        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .basic_auth(format!("{}/token", self.email), Some(&self.api_token));

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, url = %url, "Calling zendesk api");
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let bytes = response.bytes().await?;

        if !(200..300).contains(&status) {
            tracing::warn!(method = %request.method, url = %url, status, "Zendesk api returned error status");
        }

        Ok(RemoteCallResponse::from_parts(
            status,
            response_headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_bytes())),
            &bytes,
        ))
    }
}

impl fmt::Debug for ZendeskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZendeskClient")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .finish()
    }
}

#[async_trait]
impl ActionHandler for ZendeskClient {
    async fn handle(&self, input: Value) -> Result<Value> {
        let request = RemoteCallRequest::from_input(input)?;
        self.call(&request).await?.to_value()
    }
}
