//! Schema tree and the recursive validator.

use super::errors::{FieldError, ValidationErrors};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn is_email(s: &str) -> bool {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

// =============================================================================
// String formats
// =============================================================================

/// Named string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
}

impl StringFormat {
    fn matches(self, s: &str) -> bool {
        match self {
            StringFormat::Email => is_email(s),
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFormat::Email => f.write_str("email"),
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Composable value-shape descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<StringFormat>,
    },
    Number,
    Integer,
    Boolean,
    /// Accepts any JSON value.
    Any,
    Enum {
        values: Vec<String>,
    },
    Object {
        fields: Vec<Field>,
    },
    Array {
        items: Box<Schema>,
    },
    /// String-keyed map with uniform values.
    Record {
        values: Box<Schema>,
    },
    /// Field may be absent. `default` is inserted only on absence, never
    /// in place of an explicit `null`.
    Optional {
        inner: Box<Schema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
    },
    Nullable {
        inner: Box<Schema>,
    },
}

/// A named member of an object schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_required(&self) -> bool {
        !self.schema.is_optional()
    }
}

// Constructors
impl Schema {
    pub fn string() -> Self {
        Schema::String {
            min_length: None,
            format: None,
        }
    }

    pub fn email() -> Self {
        Schema::String {
            min_length: None,
            format: Some(StringFormat::Email),
        }
    }

    pub fn number() -> Self {
        Schema::Number
    }

    pub fn integer() -> Self {
        Schema::Integer
    }

    pub fn boolean() -> Self {
        Schema::Boolean
    }

    pub fn any() -> Self {
        Schema::Any
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Object {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }

    pub fn record(values: Schema) -> Self {
        Schema::Record {
            values: Box::new(values),
        }
    }

    /// Minimum character count. No-op on non-string schemas.
    pub fn min_length(self, min: usize) -> Self {
        match self {
            Schema::String { format, .. } => Schema::String {
                min_length: Some(min),
                format,
            },
            other => other,
        }
    }

    pub fn optional(self) -> Self {
        match self {
            Schema::Optional { .. } => self,
            inner => Schema::Optional {
                inner: Box::new(inner),
                default: None,
            },
        }
    }

    /// Optional with a value filled in when the field is absent.
    pub fn with_default(self, default: Value) -> Self {
        match self {
            Schema::Optional { inner, .. } => Schema::Optional {
                inner,
                default: Some(default),
            },
            inner => Schema::Optional {
                inner: Box::new(inner),
                default: Some(default),
            },
        }
    }

    pub fn nullable(self) -> Self {
        Schema::Nullable {
            inner: Box::new(self),
        }
    }
}

// Introspection
impl Schema {
    pub fn is_optional(&self) -> bool {
        matches!(self, Schema::Optional { .. })
    }

    /// Object members, or `None` for non-object schemas.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Schema::Object { fields } => Some(fields.as_slice()),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Human-readable type name, e.g. `string`, `enum(GET|POST)`, `string[]`.
    pub fn display_name(&self) -> String {
        match self {
            Schema::String {
                format: Some(format),
                ..
            } => format.to_string(),
            Schema::String { .. } => "string".to_string(),
            Schema::Number => "number".to_string(),
            Schema::Integer => "integer".to_string(),
            Schema::Boolean => "boolean".to_string(),
            Schema::Any => "any".to_string(),
            Schema::Enum { values } => format!("enum({})", values.join("|")),
            Schema::Object { .. } => "object".to_string(),
            Schema::Array { items } => format!("{}[]", items.display_name()),
            Schema::Record { values } => format!("record<{}>", values.display_name()),
            Schema::Optional { inner, .. } => inner.display_name(),
            Schema::Nullable { inner } => format!("{} | null", inner.display_name()),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

impl Schema {
    /// Validate `value`, returning it with defaults applied.
    ///
    /// Collects every offending field instead of stopping at the first one.
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationErrors> {
        let mut errors = Vec::new();
        let normalized = self.check(value, "", &mut errors);
        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationErrors::from(errors))
        }
    }

    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) -> Value {
        match self {
            Schema::String { min_length, format } => {
                let Some(s) = value.as_str() else {
                    errors.push(FieldError::type_mismatch(path, "string", value_type_name(value)));
                    return value.clone();
                };
                if let Some(min) = *min_length {
                    let len = s.chars().count();
                    if len < min {
                        errors.push(FieldError::min_length(path, min, len));
                    }
                }
                if let Some(format) = *format {
                    if !format.matches(s) {
                        errors.push(FieldError::format(path, format));
                    }
                }
                value.clone()
            }
            Schema::Number => {
                if !value.is_number() {
                    errors.push(FieldError::type_mismatch(path, "number", value_type_name(value)));
                }
                value.clone()
            }
            Schema::Integer => {
                if !(value.is_i64() || value.is_u64()) {
                    errors.push(FieldError::type_mismatch(path, "integer", value_type_name(value)));
                }
                value.clone()
            }
            Schema::Boolean => {
                if !value.is_boolean() {
                    errors.push(FieldError::type_mismatch(path, "boolean", value_type_name(value)));
                }
                value.clone()
            }
            Schema::Any => value.clone(),
            Schema::Enum { values } => {
                match value.as_str() {
                    Some(s) if values.iter().any(|v| v == s) => {}
                    Some(s) => errors.push(FieldError::one_of(path, values, s)),
                    None => errors.push(FieldError::type_mismatch(
                        path,
                        "string",
                        value_type_name(value),
                    )),
                }
                value.clone()
            }
            Schema::Object { fields } => {
                let Some(map) = value.as_object() else {
                    errors.push(FieldError::type_mismatch(path, "object", value_type_name(value)));
                    return value.clone();
                };
                // Unknown members pass through untouched.
                let mut out = map.clone();
                for field in fields {
                    let child = join_field(path, &field.name);
                    match map.get(&field.name) {
                        Some(v) => {
                            let normalized = field.schema.check(v, &child, errors);
                            out.insert(field.name.clone(), normalized);
                        }
                        None => match &field.schema {
                            Schema::Optional {
                                default: Some(default),
                                ..
                            } => {
                                out.insert(field.name.clone(), default.clone());
                            }
                            Schema::Optional { .. } => {}
                            _ => errors.push(FieldError::missing(&child)),
                        },
                    }
                }
                Value::Object(out)
            }
            Schema::Array { items } => {
                let Some(arr) = value.as_array() else {
                    errors.push(FieldError::type_mismatch(path, "array", value_type_name(value)));
                    return value.clone();
                };
                let out = arr
                    .iter()
                    .enumerate()
                    .map(|(i, item)| items.check(item, &format!("{}[{}]", path, i), errors))
                    .collect();
                Value::Array(out)
            }
            Schema::Record { values } => {
                let Some(map) = value.as_object() else {
                    errors.push(FieldError::type_mismatch(path, "object", value_type_name(value)));
                    return value.clone();
                };
                let out: Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), values.check(v, &join_field(path, k), errors)))
                    .collect();
                Value::Object(out)
            }
            // Presence is decided by the enclosing object; a value that is
            // present (including null) must satisfy the inner schema.
            Schema::Optional { inner, .. } => inner.check(value, path, errors),
            Schema::Nullable { inner } => {
                if value.is_null() {
                    Value::Null
                } else {
                    inner.check(value, path, errors)
                }
            }
        }
    }
}

fn join_field(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
