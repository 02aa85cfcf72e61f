//! Typed access to tool call arguments.

use serde::de::DeserializeOwned;

use crate::error::AtelierError;

/// Arguments the model supplied for a function call.
///
/// Providers hand over either a parsed JSON object or, when the model emitted
/// malformed JSON, the raw argument string.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value: normalize(value),
        }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str, AtelierError> {
        self.get_str_opt(key)
            .ok_or_else(|| AtelierError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, AtelierError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            AtelierError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

/// Re-parse string-encoded arguments; blank strings become `{}`.
fn normalize(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
            }
        }
        other => other,
    }
}
