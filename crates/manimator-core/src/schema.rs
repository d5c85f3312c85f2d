//! Tool schema bridging
//!
//! A tool host describes each tool with a JSON-schema input mapping. Model
//! function-calling endpoints accept a narrower dialect, so presentation-only
//! keys are stripped before the schema is handed over. Field names, `type`,
//! `required` and `enum` are never touched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Keys that only carry presentation metadata
const PRESENTATION_KEYS: &[&str] = &["title", "$schema"];

/// A tool exposed by the tool host, as reported at discovery time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (the name used when calling it)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON-schema-like parameter mapping
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A model-facing function signature derived from a [`ToolDescriptor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&ToolDescriptor> for FunctionDeclaration {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: sanitize(&tool.input_schema),
        }
    }
}

/// Return a copy of `schema` with presentation-only keys removed at every level
///
/// Idempotent. Non-object nodes are returned unchanged.
pub fn sanitize(schema: &Value) -> Value {
    let mut cleaned = schema.clone();
    sanitize_in_place(&mut cleaned);
    cleaned
}

/// Keywords whose value is a list of subschemas
const SCHEMA_LISTS: &[&str] = &["anyOf", "oneOf", "allOf", "prefixItems"];

/// Keywords whose value maps names to subschemas
const SCHEMA_MAPS: &[&str] = &["properties", "patternProperties", "$defs", "definitions"];

/// Keywords whose value is a single subschema
const SCHEMA_SLOTS: &[&str] = &["additionalProperties", "not", "if", "then", "else"];

/// Strip presentation-only keys from `schema` in place
pub fn sanitize_in_place(schema: &mut Value) {
    let Value::Object(node) = schema else {
        return;
    };

    for key in PRESENTATION_KEYS {
        node.remove(*key);
    }

    // Map keys are field or definition names, only their values are schemas
    for key in SCHEMA_MAPS {
        if let Some(Value::Object(children)) = node.get_mut(*key) {
            children.values_mut().for_each(sanitize_in_place);
        }
    }

    for key in SCHEMA_LISTS {
        if let Some(Value::Array(children)) = node.get_mut(*key) {
            children.iter_mut().for_each(sanitize_in_place);
        }
    }

    // `additionalProperties: false` and friends are left alone by the guard above
    for key in SCHEMA_SLOTS {
        if let Some(child) = node.get_mut(*key) {
            sanitize_in_place(child);
        }
    }

    match node.get_mut("items") {
        Some(Value::Array(items)) => items.iter_mut().for_each(sanitize_in_place),
        Some(items) => sanitize_in_place(items),
        None => {}
    }
}

/// Map each tool to exactly one function declaration, preserving order
pub fn to_function_declarations(tools: &[ToolDescriptor]) -> Vec<FunctionDeclaration> {
    tools.iter().map(FunctionDeclaration::from).collect()
}

/// Wrap declarations in the `tools` array of a Gemini request
///
/// Each declaration gets its own tool entry.
pub fn gemini_tools(declarations: &[FunctionDeclaration]) -> Value {
    Value::Array(
        declarations
            .iter()
            .map(|decl| json!({ "functionDeclarations": [decl] }))
            .collect(),
    )
}

/// Build a descriptor from a raw JSON object, tolerating missing fields
///
/// Accepts both `inputSchema` (MCP wire casing) and `input_schema`.
pub fn descriptor_from_json(raw: &Map<String, Value>) -> Option<ToolDescriptor> {
    let name = raw.get("name")?.as_str()?;
    let description = raw
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let input_schema = raw
        .get("inputSchema")
        .or_else(|| raw.get("input_schema"))
        .cloned()
        .unwrap_or_else(|| json!({ "type": "object" }));

    Some(ToolDescriptor::new(name, description, input_schema))
}
