//! Check function-call arguments against the declared contract.

use serde_json::Value;

use crate::error::AtelierError;

/// Top-level JSON Schema check: object shape, required keys, property types.
///
/// Returns the first violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), AtelierError> {
    if schema.get("type").and_then(Value::as_str) == Some("object") && !args.is_object() {
        return Err(violation(format!(
            "expected object arguments, got {}",
            json_type_name(args)
        )));
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        if let Some(missing) = required
            .iter()
            .filter_map(Value::as_str)
            .find(|name| !obj.contains_key(*name))
        {
            return Err(violation(format!("missing required field '{missing}'")));
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, value) in obj {
            let expected = properties
                .get(key)
                .and_then(|prop| prop.get("type"))
                .and_then(Value::as_str);
            if let Some(expected) = expected {
                if !value_matches_type(value, expected) {
                    return Err(violation(format!(
                        "field '{key}' expected type '{expected}', got {}",
                        json_type_name(value)
                    )));
                }
            }
            let allowed = properties
                .get(key)
                .and_then(|prop| prop.get("enum"))
                .and_then(Value::as_array);
            if let Some(allowed) = allowed {
                if !allowed.contains(value) {
                    return Err(violation(format!("field '{key}' has unsupported value {value}")));
                }
            }
        }
    }

    Ok(())
}

fn violation(message: String) -> AtelierError {
    AtelierError::InvalidArgument(message)
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
