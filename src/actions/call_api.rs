//! `callApi` payloads: request/response envelopes for the passthrough action.
//!
//! The schema layer only checks that `headers`, `params` and `requestBody` are
//! strings. Decoding them as JSON happens here, at execution time, and a
//! malformed string is an [`Error::Execution`], never a schema error.

use crate::schema::{value_type_name, Schema};
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Separator used when a header carries several values.
pub const HEADER_FOLD_SEPARATOR: &str = ", ";

/// HTTP verbs accepted by the passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Validated `callApi` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCallRequest {
    pub method: HttpMethod,
    /// Relative to the configured API base URL.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
}

impl RemoteCallRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: None,
            params: None,
            request_body: None,
        }
    }

    /// Typed view of input that already passed the `callApi` input schema.
    pub fn from_input(input: Value) -> Result<Self> {
        Ok(serde_json::from_value(input)?)
    }

    /// Decode the `headers` JSON string into name/value pairs.
    ///
    /// Non-string scalars are stringified; nested values are rejected.
    pub fn parsed_headers(&self) -> Result<BTreeMap<String, String>> {
        let Some(map) = parse_object("headers", self.headers.as_deref())? else {
            return Ok(BTreeMap::new());
        };
        let mut out = BTreeMap::new();
        for (name, value) in map {
            let value = scalar_to_string(&value).ok_or_else(|| {
                Error::execution(format!("headers: value for '{}' must be a scalar", name))
            })?;
            out.insert(name, value);
        }
        Ok(out)
    }

    /// Decode the `params` JSON string into query pairs.
    ///
    /// Arrays repeat the key once per element, `null` entries are skipped and
    /// nested objects are sent as their JSON text.
    pub fn parsed_params(&self) -> Result<Vec<(String, String)>> {
        let Some(map) = parse_object("params", self.params.as_deref())? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items.iter().filter(|v| !v.is_null()) {
                        out.push((key.clone(), query_value(item)));
                    }
                }
                other => out.push((key, query_value(&other))),
            }
        }
        Ok(out)
    }

    /// Decode the `requestBody` JSON string. Any JSON value is allowed.
    pub fn parsed_body(&self) -> Result<Option<Value>> {
        match self.request_body.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| Error::execution(format!("requestBody: invalid JSON: {}", e))),
        }
    }
}

fn parse_object(field: &str, raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::execution(format!("{}: invalid JSON: {}", field, e)))?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(Error::execution(format!(
            "{}: expected a JSON object, got {}",
            field,
            value_type_name(&other)
        ))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn query_value(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| value.to_string())
}

// =============================================================================
// Response
// =============================================================================

/// Generic HTTP response envelope returned by `callApi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCallResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Map<String, Value>,
}

impl RemoteCallResponse {
    /// Build the envelope from raw response parts.
    pub fn from_parts<'a, I>(status: u16, headers: I, body: &[u8]) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        Self {
            status,
            headers: fold_headers(headers),
            data: response_data(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Collapse possibly repeated headers into a flat map.
///
/// Names are lowercased; repeated names join their values in arrival order
/// with [`HEADER_FOLD_SEPARATOR`]. Non-UTF-8 bytes are decoded lossily.
pub fn fold_headers<'a, I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, raw) in headers {
        let value = String::from_utf8_lossy(raw);
        match out.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(HEADER_FOLD_SEPARATOR);
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.into_owned());
            }
        }
    }
    out
}

/// Map a response body onto the `data` record.
///
/// Objects pass through; an empty body is `{}`; anything else lands under a
/// single `body` key (parsed JSON when possible, raw text otherwise).
pub fn response_data(body: &[u8]) -> Map<String, Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Map::new();
    }
    let value = serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("body".to_string(), other);
            map
        }
    }
}

/// The `callApi` output schema, for checking envelopes built outside the
/// dispatcher.
pub fn response_schema() -> Schema {
    super::catalog::call_api().output_schema
}
