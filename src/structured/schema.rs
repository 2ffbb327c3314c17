//! Declarative output contracts.
//!
//! A [`Schema`] is built entirely from `const` data so every operation can own
//! an immutable `static` contract. It renders to two dialects:
//! the provider's `responseSchema` (OpenAPI subset, upper-case type names) and
//! standard JSON Schema used by the local [`OutputValidator`](super::OutputValidator).

use serde_json::{json, Map, Value};

/// One node of a schema tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaNode {
    String {
        description: &'static str,
        /// Allowed values; empty means any string.
        enum_values: &'static [&'static str],
    },
    Integer {
        description: &'static str,
    },
    Number {
        description: &'static str,
    },
    Boolean {
        description: &'static str,
    },
    Array {
        description: &'static str,
        items: &'static SchemaNode,
    },
    Object {
        description: &'static str,
        properties: &'static [Property],
    },
}

/// Named field of an object node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub required: bool,
    pub node: SchemaNode,
}

impl Property {
    pub const fn required(name: &'static str, node: SchemaNode) -> Self {
        Self {
            name,
            required: true,
            node,
        }
    }

    pub const fn optional(name: &'static str, node: SchemaNode) -> Self {
        Self {
            name,
            required: false,
            node,
        }
    }
}

impl SchemaNode {
    pub const fn string(description: &'static str) -> Self {
        Self::String {
            description,
            enum_values: &[],
        }
    }

    pub const fn enumeration(
        description: &'static str,
        enum_values: &'static [&'static str],
    ) -> Self {
        Self::String {
            description,
            enum_values,
        }
    }

    pub const fn integer(description: &'static str) -> Self {
        Self::Integer { description }
    }

    pub const fn number(description: &'static str) -> Self {
        Self::Number { description }
    }

    pub const fn boolean(description: &'static str) -> Self {
        Self::Boolean { description }
    }

    pub const fn array(description: &'static str, items: &'static SchemaNode) -> Self {
        Self::Array { description, items }
    }

    pub const fn object(description: &'static str, properties: &'static [Property]) -> Self {
        Self::Object {
            description,
            properties,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::String { description, .. }
            | Self::Integer { description }
            | Self::Number { description }
            | Self::Boolean { description }
            | Self::Array { description, .. }
            | Self::Object { description, .. } => *description,
        }
    }

    fn render(&self, dialect: Dialect) -> Value {
        let mut map = Map::new();
        let type_name = match self {
            Self::String { .. } => "string",
            Self::Integer { .. } => "integer",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        };
        let type_name = match dialect {
            Dialect::Provider => type_name.to_uppercase(),
            Dialect::JsonSchema => type_name.to_string(),
        };
        map.insert("type".into(), Value::String(type_name));

        if !self.description().is_empty() {
            map.insert("description".into(), json!(self.description()));
        }

        match self {
            Self::String { enum_values, .. } if !enum_values.is_empty() => {
                map.insert("enum".into(), json!(enum_values));
            }
            Self::Array { items, .. } => {
                map.insert("items".into(), items.render(dialect));
            }
            Self::Object { properties, .. } => {
                let mut props = Map::new();
                let mut required = Vec::new();
                for p in properties.iter() {
                    props.insert(p.name.to_string(), p.node.render(dialect));
                    if p.required {
                        required.push(p.name);
                    }
                }
                map.insert("properties".into(), props.into());
                if !required.is_empty() {
                    map.insert("required".into(), json!(required));
                }
                if dialect == Dialect::Provider {
                    // Keeps the provider's field order stable across replies.
                    let order: Vec<&str> = properties.iter().map(|p| p.name).collect();
                    map.insert("propertyOrdering".into(), json!(order));
                }
            }
            _ => {}
        }

        map.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Provider,
    JsonSchema,
}

/// Output contract of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub root: SchemaNode,
}

impl Schema {
    pub const fn new(name: &'static str, root: SchemaNode) -> Self {
        Self { name, root }
    }

    /// Render for the provider's `generationConfig.responseSchema`.
    pub fn to_response_schema(&self) -> Value {
        self.root.render(Dialect::Provider)
    }

    /// Render as standard JSON Schema for local validation.
    pub fn to_json_schema(&self) -> Value {
        let mut value = self.root.render(Dialect::JsonSchema);
        if let Value::Object(map) = &mut value {
            map.insert("title".into(), json!(self.name));
        }
        value
    }

    /// Top-level field names, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        match self.root {
            SchemaNode::Object { properties, .. } => properties.iter().map(|p| p.name).collect(),
            _ => Vec::new(),
        }
    }
}
