//! JSON schema descriptions of output shapes.
//!
//! These types only describe a shape so it can be forwarded to a generation
//! backend as the target output format. Enforcement happens in
//! [`TypedSchema`](crate::TypedSchema).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// JSON Schema for an object type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectJsonSchema {
    /// The schema type (always "object").
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions, in declaration order.
    pub properties: IndexMap<String, JsonValue>,

    /// List of required property names.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether additional properties are allowed.
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,

    /// Extra schema keywords.
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl ObjectJsonSchema {
    /// Create a new empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
            description: None,
            additional_properties: None,
            extra: HashMap::new(),
        }
    }

    /// Add a property to the schema.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Set whether additional properties are allowed.
    #[must_use]
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Check if a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Get a property schema.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&JsonValue> {
        self.properties.get(name)
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Default for ObjectJsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectJsonSchema> for JsonValue {
    fn from(schema: ObjectJsonSchema) -> Self {
        serde_json::to_value(schema).unwrap_or(JsonValue::Null)
    }
}

/// Fluent builder for object schemas.
///
/// ```rust
/// use prompt_fn_output::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .string("summary", "One sentence summary", true)
///     .enum_values("severity", "Ticket severity", &["low", "medium", "high", "critical"], true)
///     .description("Support ticket triage")
///     .build();
///
/// assert!(schema.is_required("severity"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: ObjectJsonSchema,
}

impl SchemaBuilder {
    /// Create a new empty schema builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn typed(self, name: &str, kind: &str, desc: &str, required: bool) -> Self {
        self.raw(
            name,
            serde_json::json!({ "type": kind, "description": desc }),
            required,
        )
    }

    /// Add a string property.
    #[must_use]
    pub fn string(self, name: &str, desc: &str, required: bool) -> Self {
        self.typed(name, "string", desc, required)
    }

    /// Add an integer property.
    #[must_use]
    pub fn integer(self, name: &str, desc: &str, required: bool) -> Self {
        self.typed(name, "integer", desc, required)
    }

    /// Add a number (float) property.
    #[must_use]
    pub fn number(self, name: &str, desc: &str, required: bool) -> Self {
        self.typed(name, "number", desc, required)
    }

    /// Add a boolean property.
    #[must_use]
    pub fn boolean(self, name: &str, desc: &str, required: bool) -> Self {
        self.typed(name, "boolean", desc, required)
    }

    /// Add an array property.
    #[must_use]
    pub fn array(self, name: &str, desc: &str, items: JsonValue, required: bool) -> Self {
        self.raw(
            name,
            serde_json::json!({ "type": "array", "description": desc, "items": items }),
            required,
        )
    }

    /// Add a string array property.
    #[must_use]
    pub fn string_array(self, name: &str, desc: &str, required: bool) -> Self {
        self.array(name, desc, serde_json::json!({"type": "string"}), required)
    }

    /// Add an enum property (string values).
    #[must_use]
    pub fn enum_values(self, name: &str, desc: &str, values: &[&str], required: bool) -> Self {
        self.raw(
            name,
            serde_json::json!({ "type": "string", "description": desc, "enum": values }),
            required,
        )
    }

    /// Add a raw JSON property.
    #[must_use]
    pub fn raw(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.schema = self.schema.with_property(name, schema, required);
        self
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, desc: &str) -> Self {
        self.schema = self.schema.with_description(desc);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ObjectJsonSchema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_object_json_schema_new() {
        let schema = ObjectJsonSchema::new();
        assert_eq!(schema.schema_type, "object");
        assert!(schema.properties.is_empty());
    }

    #[test]
    fn test_builder_serializes_in_declaration_order() {
        let schema = SchemaBuilder::new()
            .number("result", "The sum", true)
            .string("note", "Optional note", false)
            .build();

        let json = schema.to_json().unwrap();
        assert_eq!(
            json,
            json!({
                "type": "object",
                "properties": {
                    "result": {"type": "number", "description": "The sum"},
                    "note": {"type": "string", "description": "Optional note"}
                },
                "required": ["result"]
            })
        );
        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["result", "note"]);
    }

    #[test]
    fn test_enum_and_array_properties() {
        let schema = SchemaBuilder::new()
            .enum_values("tier", "Customer tier", &["free", "pro"], true)
            .string_array("tags", "Tags", false)
            .build();

        assert_eq!(schema.get_property("tier").unwrap()["enum"], json!(["free", "pro"]));
        assert_eq!(schema.get_property("tags").unwrap()["items"], json!({"type": "string"}));
        assert!(schema.is_required("tier"));
        assert!(!schema.is_required("tags"));
    }

    #[test]
    fn test_additional_properties_flag() {
        let json: JsonValue = ObjectJsonSchema::new().with_additional_properties(false).into();
        assert_eq!(json["additionalProperties"], json!(false));
    }
}
