//! Output validator for structured replies.
//!
//! Checks a parsed reply against the JSON-Schema rendering of a [`Schema`]:
//! value types, enumerated strings, required properties, nested objects and
//! array items. Unknown properties are tolerated unless the validator is
//! strict.

use crate::structured::error::{ValidationError, ValidationResult};
use crate::structured::schema::Schema;
use serde_json::Value;
use std::collections::HashSet;

/// Validator for structured output.
#[derive(Debug, Clone)]
pub struct OutputValidator {
    schema: Value,
    strict: bool,
}

impl OutputValidator {
    /// Create a validator from a JSON schema.
    ///
    /// `strict` rejects properties the schema does not declare.
    pub fn new(schema: Value, strict: bool) -> Self {
        Self { schema, strict }
    }

    pub fn strict(schema: Value) -> Self {
        Self::new(schema, true)
    }

    pub fn lenient(schema: Value) -> Self {
        Self::new(schema, false)
    }

    /// Lenient validator for an operation's output contract.
    pub fn for_schema(schema: &Schema) -> Self {
        Self::lenient(schema.to_json_schema())
    }

    /// Validate `data`. On success the returned value has whole-number
    /// floats in integer positions rewritten as integers.
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let mut errors = Vec::new();
        let mut normalized = data.clone();
        self.check(&mut normalized, &self.schema, "", &mut errors);
        if errors.is_empty() {
            ValidationResult::success(normalized)
        } else {
            ValidationResult::failure(errors)
        }
    }

    /// Validate and return the value, or every error found.
    pub fn validate_or_fail(&self, data: &Value) -> Result<Value, Vec<ValidationError>> {
        self.validate(data).into_result()
    }

    fn check(
        &self,
        data: &mut Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let schema_type = schema.get("type").and_then(|t| t.as_str());
        if let Some(type_name) = schema_type {
            if let Err(e) = validate_type(data, type_name, path) {
                errors.push(e);
                return;
            }
        }
        if schema_type == Some("integer") {
            normalize_integer(data);
        }

        match schema_type {
            Some("array") => self.check_array(data, schema, path, errors),
            Some("object") => self.check_object(data, schema, path, errors),
            _ => {}
        }

        if let Some(enum_values) = schema.get("enum").and_then(|e| e.as_array()) {
            validate_enum(data, enum_values, path, errors);
        }
    }

    fn check_array(
        &self,
        data: &mut Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let (Some(items), Some(items_schema)) = (data.as_array_mut(), schema.get("items")) else {
            return;
        };
        for (i, item) in items.iter_mut().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            self.check(item, items_schema, &item_path, errors);
        }
    }

    fn check_object(
        &self,
        data: &mut Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(obj) = data.as_object_mut() else {
            return;
        };

        let required = schema
            .get("required")
            .and_then(|r| r.as_array())
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str());
        for name in required {
            if !obj.contains_key(name) {
                errors.push(ValidationError::with_path(
                    format!("Missing required property: {}", name),
                    join(path, name),
                ));
            }
        }

        let properties = schema.get("properties").and_then(|p| p.as_object());
        if let Some(properties) = properties {
            for (name, prop_schema) in properties {
                if let Some(value) = obj.get_mut(name) {
                    self.check(value, prop_schema, &join(path, name), errors);
                }
            }
        }

        let allow_additional = schema
            .get("additionalProperties")
            .and_then(|a| a.as_bool())
            .unwrap_or(!self.strict);
        if !allow_additional {
            let declared: HashSet<&str> = properties
                .map(|p| p.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            for key in obj.keys().filter(|k| !declared.contains(k.as_str())) {
                errors.push(ValidationError::with_path(
                    format!("Additional property not allowed: {}", key),
                    join(path, key),
                ));
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn type_name_of(data: &Value) -> &'static str {
    match data {
        Value::String(_) => "string",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

fn whole_float(data: &Value) -> Option<f64> {
    if !data.is_f64() {
        return None;
    }
    data.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER)
}

/// Rewrite a whole-number float such as `3.0` as the integer `3`.
fn normalize_integer(data: &mut Value) {
    let Some(f) = whole_float(data) else {
        return;
    };
    // Exact: `f` is whole and within the f64 integer range.
    *data = if f < 0.0 {
        Value::from(f as i64)
    } else {
        Value::from(f as u64)
    };
}

fn validate_type(data: &Value, expected_type: &str, path: &str) -> Result<(), ValidationError> {
    let is_valid = match expected_type {
        "string" => data.is_string(),
        // Models sometimes write whole numbers as `3.0`.
        "integer" => data.is_i64() || data.is_u64() || whole_float(data).is_some(),
        "number" => data.is_number(),
        "boolean" => data.is_boolean(),
        "array" => data.is_array(),
        "object" => data.is_object(),
        "null" => data.is_null(),
        _ => true,
    };

    if is_valid {
        Ok(())
    } else {
        Err(ValidationError::with_path(
            format!(
                "Expected type '{}', got '{}'",
                expected_type,
                type_name_of(data)
            ),
            path.to_string(),
        ))
    }
}

fn validate_enum(data: &Value, enum_values: &[Value], path: &str, errors: &mut Vec<ValidationError>) {
    if enum_values.contains(data) {
        return;
    }
    let allowed: Vec<String> = enum_values
        .iter()
        .map(|v| match v {
            Value::String(s) => format!("\"{}\"", s),
            _ => v.to_string(),
        })
        .collect();
    errors.push(ValidationError::with_path(
        format!("Value not in allowed enum values: {}", allowed.join(", ")),
        path.to_string(),
    ));
}
