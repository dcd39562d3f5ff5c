//! Tool definitions, calls and results exchanged with the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool the model may call, with a JSON-schema parameter description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A request from the model to run a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    /// Create a call with a fresh id.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: format!("call-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            arguments,
        }
    }

    pub fn get_arg(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Required string argument.
    pub fn get_string_arg(&self, key: &str) -> Result<&str, String> {
        self.get_arg(key)
            .ok_or_else(|| format!("missing required argument '{}'", key))?
            .as_str()
            .ok_or_else(|| format!("argument '{}' must be a string", key))
    }

    /// Optional string argument; `null` counts as absent.
    pub fn get_optional_string_arg(&self, key: &str) -> Result<Option<&str>, String> {
        match self.get_arg(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| format!("argument '{}' must be a string", key)),
        }
    }

    /// Integer argument, accepting numeric strings as sent by some models.
    pub fn get_optional_i64_arg(&self, key: &str) -> Result<Option<i64>, String> {
        match self.get_arg(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| format!("argument '{}' must be an integer", key)),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("argument '{}' must be an integer", key)),
            Some(_) => Err(format!("argument '{}' must be an integer", key)),
        }
    }

    pub fn get_i64_arg(&self, key: &str) -> Result<i64, String> {
        self.get_optional_i64_arg(key)?
            .ok_or_else(|| format!("missing required argument '{}'", key))
    }
}

/// Outcome of a tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}
