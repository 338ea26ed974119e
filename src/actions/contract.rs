//! Action contracts: the (input schema, output schema, UI hints) triple.

use crate::schema::Schema;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Display metadata for one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiHint {
    pub title: String,
}

/// Complete contract for one named action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContract {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Schema,
    pub output_schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_hints: Option<BTreeMap<String, UiHint>>,
}

impl ActionContract {
    /// Start a contract with empty-object input and output schemas.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            input_schema: Schema::object([]),
            output_schema: Schema::object([]),
            ui_hints: None,
        }
    }

    pub fn input(mut self, schema: Schema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn output(mut self, schema: Schema) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn ui_hint(mut self, field: impl Into<String>, title: impl Into<String>) -> Self {
        self.ui_hints
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), UiHint { title: title.into() });
        self
    }

    /// Check the contract is well-formed.
    ///
    /// Name must be non-empty, both schemas must describe objects and every
    /// UI hint must point at an input field.
    pub fn check(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_contract("action name cannot be empty"));
        }
        if self.input_schema.fields().is_none() {
            return Err(Error::invalid_contract(format!(
                "{}: input schema must be an object",
                self.name
            )));
        }
        if self.output_schema.fields().is_none() {
            return Err(Error::invalid_contract(format!(
                "{}: output schema must be an object",
                self.name
            )));
        }
        if let Some(hints) = &self.ui_hints {
            for field in hints.keys() {
                if self.input_schema.field(field).is_none() {
                    return Err(Error::invalid_contract(format!(
                        "{}: ui hint references unknown input field '{}'",
                        self.name, field
                    )));
                }
            }
        }
        Ok(())
    }

    /// Catalog line for this action.
    ///
    /// Format: `- name(field: type, optional?: type): description`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .input_schema
            .fields()
            .unwrap_or_default()
            .iter()
            .map(|f| {
                let optional = if f.is_required() { "" } else { "?" };
                format!("{}{}: {}", f.name, optional, f.schema.display_name())
            })
            .collect();

        format!("- {}({}): {}", self.name, params.join(", "), self.description)
    }

    /// Host-facing description with JSON Schema renderings.
    pub fn describe(&self) -> Value {
        let mut out = json!({
            "name": self.name,
            "title": self.title,
            "description": self.description,
            "input": { "schema": self.input_schema.to_json_schema() },
            "output": { "schema": self.output_schema.to_json_schema() },
        });
        if let Some(hints) = &self.ui_hints {
            out["input"]["ui"] = json!(hints);
        }
        out
    }
}
