//! Helpers to build response schemas
//!
//! Gemini's `responseSchema` accepts a subset of OpenAPI 3 with upper-case
//! type names (`OBJECT`, `ARRAY`, `STRING`, `NUMBER`, ...). These helpers
//! produce that dialect as plain [`serde_json::Value`]s.
//!
//! # Example
//!
//! ```
//! use firm_llm::schema;
//! use serde_json::json;
//!
//! let period = schema::object(
//!     json!({
//!         "label": schema::string(),
//!         "revenue": schema::number(),
//!     }),
//!     &["label"],
//! );
//! assert_eq!(period["type"], "OBJECT");
//! assert_eq!(period["required"][0], "label");
//! ```

use serde_json::{Value, json};

/// Object schema with the given properties and required property names
pub fn object(properties: Value, required: &[&str]) -> Value {
    let mut schema = json!({
        "type": "OBJECT",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// String schema
pub fn string() -> Value {
    json!({ "type": "STRING" })
}

/// Number schema
pub fn number() -> Value {
    json!({ "type": "NUMBER" })
}

/// Integer schema
pub fn integer() -> Value {
    json!({ "type": "INTEGER" })
}

/// Boolean schema
pub fn boolean() -> Value {
    json!({ "type": "BOOLEAN" })
}

/// Array schema with the given item schema
pub fn array(items: Value) -> Value {
    json!({
        "type": "ARRAY",
        "items": items,
    })
}

/// String schema restricted to `values`
pub fn enumeration(values: &[&str]) -> Value {
    json!({
        "type": "STRING",
        "enum": values,
    })
}

/// Attach a description to any schema
pub fn described(mut schema: Value, description: &str) -> Value {
    schema["description"] = json!(description);
    schema
}
