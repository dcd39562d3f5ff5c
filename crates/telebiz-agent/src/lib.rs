//! Telebiz Agent - actions the assistant performs on a user's behalf.
//!
//! # Core Types
//!
//! - [`ToolDefinition`], [`ToolCall`], [`ToolResult`]: the tool-calling protocol
//! - [`ReminderTools`]: create, update, delete and list reminders from
//!   natural-language times
//! - [`EntityForm`]: submit a built entity form to the backend
//!
//! Mutating actions go through an [`InFlightGuard`](telebiz_core::InFlightGuard),
//! so a duplicate request for the same logical action is rejected while the
//! first is outstanding.

pub mod error;
pub mod submit;
pub mod tool;
pub mod tools;

pub use error::{AgentError, Result};
pub use submit::EntityForm;
pub use tool::{ToolCall, ToolDefinition, ToolResult};
pub use tools::{reminder_tool_definitions, ReminderTools};
