//! Reminder models exchanged with the reminder API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChatId, MessageId, ReminderId};

/// A stored reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ReminderId,
    pub chat_id: ChatId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    pub remind_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of a create request. `remind_at` is already an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    pub chat_id: ChatId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    pub remind_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of an update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReminderUpdate {
    pub fn is_empty(&self) -> bool {
        self.remind_at.is_none() && self.note.is_none()
    }
}

/// Serialises a timestamp the way the reminder API expects it:
/// UTC, millisecond precision, `Z` suffix.
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_iso_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(to_iso(ts), "2024-01-01T02:00:00.000Z");
    }

    #[test]
    fn test_new_reminder_serializes_camel_case() {
        let body = NewReminder {
            chat_id: ChatId(42),
            message_id: Some(MessageId(7)),
            remind_at: "2024-01-01T02:00:00.000Z".into(),
            note: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chatId"], 42);
        assert_eq!(json["messageId"], 7);
        assert_eq!(json["remindAt"], "2024-01-01T02:00:00.000Z");
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ReminderUpdate::default().is_empty());
        let update = ReminderUpdate {
            note: Some("call back".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
