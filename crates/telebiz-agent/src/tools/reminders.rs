//! Reminder tools: create, update, delete and list reminders from chat.

use std::sync::Arc;

use serde_json::json;
use telebiz_client::ReminderApi;
use telebiz_core::{resolve_with_clock, Clock, InFlightGuard, SystemClock};
use telebiz_models::{to_iso, ChatId, MessageId, NewReminder, Reminder, ReminderId, ReminderUpdate};
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::tool::{ToolCall, ToolDefinition, ToolResult};

pub const CREATE_REMINDER: &str = "create_reminder";
pub const UPDATE_REMINDER: &str = "update_reminder";
pub const DELETE_REMINDER: &str = "delete_reminder";
pub const LIST_REMINDERS: &str = "list_reminders";

const REMIND_AT_HELP: &str =
    "When to remind: ISO-8601 timestamp, 'in 2 hours', 'tomorrow 9am' or 'today at 5'";

/// Definitions of every reminder tool.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            CREATE_REMINDER,
            "Schedule a reminder in a chat",
            json!({
                "type": "object",
                "properties": {
                    "remind_at": {
                        "type": "string",
                        "description": REMIND_AT_HELP
                    },
                    "note": {
                        "type": "string",
                        "description": "Text to show when the reminder fires"
                    },
                    "chat_id": {
                        "type": "integer",
                        "description": "Chat the reminder belongs to"
                    },
                    "message_id": {
                        "type": "integer",
                        "description": "Message the reminder refers to"
                    }
                },
                "required": ["remind_at", "chat_id"]
            }),
        ),
        ToolDefinition::new(
            UPDATE_REMINDER,
            "Change the time or note of an existing reminder",
            json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Reminder id"
                    },
                    "remind_at": {
                        "type": "string",
                        "description": REMIND_AT_HELP
                    },
                    "note": {
                        "type": "string",
                        "description": "New reminder text"
                    }
                },
                "required": ["id"]
            }),
        ),
        ToolDefinition::new(
            DELETE_REMINDER,
            "Cancel a reminder",
            json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Reminder id"
                    }
                },
                "required": ["id"]
            }),
        ),
        ToolDefinition::new(
            LIST_REMINDERS,
            "List upcoming reminders",
            json!({
                "type": "object",
                "properties": {
                    "chat_id": {
                        "type": "integer",
                        "description": "Only reminders of this chat"
                    }
                }
            }),
        ),
    ]
}

/// Executes reminder tool calls against a [`ReminderApi`].
pub struct ReminderTools<R: ?Sized> {
    api: Arc<R>,
    clock: Arc<dyn Clock>,
    guard: InFlightGuard,
}

impl<R: ReminderApi + ?Sized> ReminderTools<R> {
    pub fn new(api: Arc<R>) -> Self {
        Self {
            api,
            clock: Arc::new(SystemClock),
            guard: InFlightGuard::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Shares an existing guard, e.g. with form submission.
    pub fn with_guard(mut self, guard: InFlightGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn guard(&self) -> &InFlightGuard {
        &self.guard
    }

    /// Runs `call`.
    ///
    /// Unparseable times, duplicate in-flight actions and backend failures
    /// come back as error results the model can relay; malformed arguments
    /// and unknown tools are errors.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        debug!("Executing reminder tool: {}", call.name);

        let outcome = match call.name.as_str() {
            CREATE_REMINDER => self.execute_create(call).await,
            UPDATE_REMINDER => self.execute_update(call).await,
            DELETE_REMINDER => self.execute_delete(call).await,
            LIST_REMINDERS => self.execute_list(call).await,
            other => return Err(AgentError::ToolNotFound(other.to_string())),
        };

        match outcome {
            Err(e) if e.is_user_facing() => {
                warn!("{} failed: {}", call.name, e);
                Ok(ToolResult::error(&call.id, e.user_message()))
            }
            other => other,
        }
    }

    async fn execute_create(&self, call: &ToolCall) -> Result<ToolResult> {
        let input = call
            .get_string_arg("remind_at")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let chat_id = call
            .get_i64_arg("chat_id")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let message_id = call
            .get_optional_i64_arg("message_id")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let note = call
            .get_optional_string_arg("note")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;

        let remind_at = to_iso(resolve_with_clock(input, self.clock.as_ref())?);
        // Keyed on the phrase: "in 1 hour" resolves differently on every read.
        let _ticket = self.guard.acquire(create_key(chat_id, input))?;

        let body = NewReminder {
            chat_id: ChatId(chat_id),
            message_id: message_id.map(MessageId),
            remind_at,
            note: note.map(str::to_string),
        };
        let reminder = self.api.create_reminder(&body).await?;
        info!("Created reminder {} for chat {}", reminder.id, chat_id);

        Ok(ToolResult::success(
            &call.id,
            format!("Reminder {} set for {}", reminder.id, to_iso(reminder.remind_at)),
        ))
    }

    async fn execute_update(&self, call: &ToolCall) -> Result<ToolResult> {
        let id = call
            .get_string_arg("id")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let input = call
            .get_optional_string_arg("remind_at")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let note = call
            .get_optional_string_arg("note")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;

        let update = ReminderUpdate {
            remind_at: input
                .map(|input| resolve_with_clock(input, self.clock.as_ref()).map(to_iso))
                .transpose()?,
            note: note.map(str::to_string),
        };
        if update.is_empty() {
            return Err(AgentError::invalid_args(
                &call.name,
                "nothing to update: pass remind_at or note",
            ));
        }

        let id = ReminderId::from_string(id);
        let _ticket = self.guard.acquire(format!("reminder:update:{}", id))?;
        let reminder = self.api.update_reminder(&id, &update).await?;
        info!("Updated reminder {}", reminder.id);

        Ok(ToolResult::success(&call.id, describe(&reminder)))
    }

    async fn execute_delete(&self, call: &ToolCall) -> Result<ToolResult> {
        let id = call
            .get_string_arg("id")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?;
        let id = ReminderId::from_string(id);
        self.api.delete_reminder(&id).await?;
        info!("Deleted reminder {}", id);
        Ok(ToolResult::success(&call.id, format!("Reminder {} deleted", id)))
    }

    async fn execute_list(&self, call: &ToolCall) -> Result<ToolResult> {
        let chat_id = call
            .get_optional_i64_arg("chat_id")
            .map_err(|e| AgentError::invalid_args(&call.name, e))?
            .map(ChatId);

        let reminders = self.api.list_reminders(chat_id).await?;
        if reminders.is_empty() {
            return Ok(ToolResult::success(&call.id, "No reminders"));
        }
        let lines: Vec<String> = reminders.iter().map(describe).collect();
        Ok(ToolResult::success(&call.id, lines.join("\n")))
    }
}

/// In-flight key for a create: chat plus the normalized phrase.
fn create_key(chat_id: i64, input: &str) -> String {
    let phrase = input.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("reminder:create:{}:{}", chat_id, phrase.to_lowercase())
}

fn describe(reminder: &Reminder) -> String {
    match &reminder.note {
        Some(note) => format!("{} at {}: {}", reminder.id, to_iso(reminder.remind_at), note),
        None => format!("{} at {}", reminder.id, to_iso(reminder.remind_at)),
    }
}
