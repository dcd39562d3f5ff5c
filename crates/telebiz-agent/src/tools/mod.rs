//! Tools exposed to the assistant model.

pub mod reminders;

pub use reminders::{
    definitions as reminder_tool_definitions, ReminderTools, CREATE_REMINDER, DELETE_REMINDER,
    LIST_REMINDERS, UPDATE_REMINDER,
};
