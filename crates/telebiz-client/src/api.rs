//! Backend API seams.
//!
//! Callers depend on these traits rather than on [`HttpClient`](crate::HttpClient)
//! so tests can substitute in-memory implementations.

use async_trait::async_trait;
use telebiz_models::{
    ChatId, CreateEntityRequest, CreatedEntity, NewReminder, Reminder, ReminderId, ReminderUpdate,
};

use crate::error::Result;

/// Creates CRM entities through a connected integration.
#[async_trait]
pub trait EntityApi: Send + Sync {
    async fn create_entity(&self, request: &CreateEntityRequest) -> Result<CreatedEntity>;
}

/// Reminder CRUD.
#[async_trait]
pub trait ReminderApi: Send + Sync {
    async fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder>;

    async fn update_reminder(&self, id: &ReminderId, update: &ReminderUpdate) -> Result<Reminder>;

    async fn delete_reminder(&self, id: &ReminderId) -> Result<()>;

    /// Lists reminders, optionally restricted to one chat.
    async fn list_reminders(&self, chat_id: Option<ChatId>) -> Result<Vec<Reminder>>;
}
