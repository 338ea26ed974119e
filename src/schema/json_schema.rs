//! JSON Schema rendering for host-side catalogs.

use super::types::{Schema, StringFormat};
use serde_json::{json, Map, Value};

impl Schema {
    /// Render as a draft-07 compatible JSON Schema document fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::String { min_length, format } => {
                let mut out = Map::new();
                out.insert("type".into(), json!("string"));
                if let Some(min) = min_length {
                    out.insert("minLength".into(), json!(min));
                }
                if let Some(StringFormat::Email) = format {
                    out.insert("format".into(), json!("email"));
                }
                Value::Object(out)
            }
            Schema::Number => json!({"type": "number"}),
            Schema::Integer => json!({"type": "integer"}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Any => json!({}),
            Schema::Enum { values } => json!({"type": "string", "enum": values}),
            Schema::Object { fields } => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    let mut prop = field.schema.to_json_schema();
                    if let (Some(desc), Some(obj)) = (&field.description, prop.as_object_mut()) {
                        obj.insert("description".into(), json!(desc));
                    }
                    properties.insert(field.name.clone(), prop);
                    if field.is_required() {
                        required.push(json!(field.name));
                    }
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": true,
                })
            }
            Schema::Array { items } => json!({"type": "array", "items": items.to_json_schema()}),
            Schema::Record { values } => json!({
                "type": "object",
                "additionalProperties": values.to_json_schema(),
            }),
            Schema::Optional { inner, default } => {
                let mut out = inner.to_json_schema();
                if let (Some(default), Some(obj)) = (default, out.as_object_mut()) {
                    obj.insert("default".into(), default.clone());
                }
                out
            }
            Schema::Nullable { inner } => json!({
                "anyOf": [inner.to_json_schema(), {"type": "null"}],
            }),
        }
    }
}
