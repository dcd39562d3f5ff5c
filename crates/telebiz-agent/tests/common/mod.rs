//! In-memory backend fakes shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use telebiz_client::{ClientError, EntityApi, ReminderApi, Result};
use telebiz_models::{
    ChatId, CreateEntityRequest, CreatedEntity, EntityId, NewReminder, Reminder, ReminderId,
    ReminderUpdate,
};
use tokio::sync::Notify;

/// Blocks a call until released, to hold an action in flight.
#[derive(Default, Clone)]
pub struct Gate(Option<Arc<Notify>>);

impl Gate {
    pub fn closed() -> Self {
        Self(Some(Arc::new(Notify::new())))
    }

    pub fn open(&self) {
        if let Some(notify) = &self.0 {
            notify.notify_one();
        }
    }

    async fn pass(&self) {
        if let Some(notify) = &self.0 {
            notify.notified().await;
        }
    }
}

fn parse_iso(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[derive(Default)]
pub struct FakeReminders {
    pub gate: Gate,
    pub stored: Mutex<Vec<Reminder>>,
    pub create_calls: Mutex<Vec<NewReminder>>,
    pub update_calls: Mutex<Vec<(ReminderId, ReminderUpdate)>>,
    pub reject_with: Mutex<Option<String>>,
}

impl FakeReminders {
    pub fn gated(gate: Gate) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }

    fn rejection(&self) -> Option<ClientError> {
        self.reject_with
            .lock()
            .unwrap()
            .clone()
            .map(|body| ClientError::Status { status: 422, body })
    }
}

#[async_trait]
impl ReminderApi for FakeReminders {
    async fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder> {
        self.create_calls.lock().unwrap().push(reminder.clone());
        self.gate.pass().await;
        if let Some(err) = self.rejection() {
            return Err(err);
        }
        let created = Reminder {
            id: ReminderId::new(),
            chat_id: reminder.chat_id,
            message_id: reminder.message_id,
            remind_at: parse_iso(&reminder.remind_at),
            note: reminder.note.clone(),
        };
        self.stored.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_reminder(&self, id: &ReminderId, update: &ReminderUpdate) -> Result<Reminder> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.clone(), update.clone()));
        let mut stored = self.stored.lock().unwrap();
        let reminder = stored
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ClientError::Status {
                status: 404,
                body: format!("reminder {} not found", id),
            })?;
        if let Some(at) = &update.remind_at {
            reminder.remind_at = parse_iso(at);
        }
        if let Some(note) = &update.note {
            reminder.note = Some(note.clone());
        }
        Ok(reminder.clone())
    }

    async fn delete_reminder(&self, id: &ReminderId) -> Result<()> {
        let mut stored = self.stored.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| &r.id != id);
        if stored.len() == before {
            return Err(ClientError::Status {
                status: 404,
                body: format!("reminder {} not found", id),
            });
        }
        Ok(())
    }

    async fn list_reminders(&self, chat_id: Option<ChatId>) -> Result<Vec<Reminder>> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .filter(|r| chat_id.map_or(true, |c| r.chat_id == c))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeEntities {
    pub gate: Gate,
    pub requests: Mutex<Vec<CreateEntityRequest>>,
    pub reject_with: Mutex<Option<String>>,
}

impl FakeEntities {
    pub fn gated(gate: Gate) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl EntityApi for FakeEntities {
    async fn create_entity(&self, request: &CreateEntityRequest) -> Result<CreatedEntity> {
        self.requests.lock().unwrap().push(request.clone());
        self.gate.pass().await;
        if let Some(body) = self.reject_with.lock().unwrap().clone() {
            return Err(ClientError::Status { status: 422, body });
        }
        Ok(CreatedEntity {
            id: EntityId::from_string(format!("{}-1", request.entity_type)),
            url: None,
        })
    }
}
