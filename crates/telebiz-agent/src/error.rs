//! Error types for the agent crate.

use telebiz_client::ClientError;
use telebiz_core::{GuardError, TemporalError};
use thiserror::Error;

/// Errors that can occur while executing tools or submitting forms.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool not found.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid tool arguments.
    #[error("invalid tool arguments for {tool_name}: {message}")]
    InvalidArguments {
        /// Name of the tool.
        tool_name: String,
        /// Error message.
        message: String,
    },

    /// Tool execution failed.
    #[error("tool execution failed: {tool_name}: {message}")]
    ToolExecution {
        /// Name of the tool that failed.
        tool_name: String,
        /// Error message.
        message: String,
    },

    /// Reminder time could not be resolved.
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Backend call failed.
    #[error("backend error: {0}")]
    Client(#[from] ClientError),

    /// The same action is already running.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    pub(crate) fn invalid_args(tool_name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool_name: tool_name.to_string(),
            message: message.into(),
        }
    }

    /// Failures a person can act on, as opposed to programming errors.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Temporal(_) | Self::Client(_) | Self::Guard(_))
    }

    /// Text to show the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::Guard(GuardError::AlreadyInFlight(_)) => {
                "This request is already being processed.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::ToolNotFound("snooze".into());
        assert_eq!(err.to_string(), "tool not found: snooze");

        let err: AgentError = TemporalError::Unparseable("someday".into()).into();
        assert_eq!(err.to_string(), "could not parse reminder time: \"someday\"");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_user_message_unpacks_client_validation() {
        let err: AgentError = ClientError::Status {
            status: 422,
            body: r#"{"message":"Invalid","errors":{"title":"required"}}"#.into(),
        }
        .into();
        assert_eq!(err.user_message(), "Invalid\n- title: required");
    }

    #[test]
    fn test_guard_message_hides_key() {
        let err: AgentError = GuardError::AlreadyInFlight("create:hubspot:deal".into()).into();
        assert!(!err.user_message().contains("hubspot"));
    }

    #[test]
    fn test_invalid_args_not_user_facing() {
        let err = AgentError::invalid_args("create_reminder", "missing chat_id");
        assert!(!err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "invalid tool arguments for create_reminder: missing chat_id"
        );
    }
}
