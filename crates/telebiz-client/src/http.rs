//! reqwest-backed implementation of the API traits.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use telebiz_models::{
    ChatId, CreateEntityRequest, CreatedEntity, NewReminder, Reminder, ReminderId, ReminderUpdate,
};
use tracing::{debug, warn};

use crate::api::{EntityApi, ReminderApi};
use crate::config::ClientConfig;
use crate::error::{unpack_validation_error, ClientError, Result};

/// Telebiz backend client.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a client from `TELEBIZ_API_URL` / `TELEBIZ_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, label: &str, request: RequestBuilder) -> Result<Response> {
        debug!("Sending {} request", label);
        let response = self.authorized(request).send().await.map_err(|e| {
            warn!("{} request failed: {}", label, e);
            ClientError::Request(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} returned {}", label, status);
        Err(status_error(status, body))
    }

    async fn send_json<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> Result<T> {
        self.send(label, request)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("{}: {}", label, e)))
    }
}

/// Maps a non-success response to the most specific error.
fn status_error(status: StatusCode, body: String) -> ClientError {
    let is_validation =
        status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY;
    if is_validation {
        if let Some(payload) = unpack_validation_error(&body) {
            return payload.into();
        }
    }
    ClientError::Status {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl EntityApi for HttpClient {
    async fn create_entity(&self, request: &CreateEntityRequest) -> Result<CreatedEntity> {
        let url = self.config.endpoint(&["entities"])?;
        self.send_json("create_entity", self.client.post(url).json(request))
            .await
    }
}

#[async_trait]
impl ReminderApi for HttpClient {
    async fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder> {
        let url = self.config.endpoint(&["reminders"])?;
        self.send_json("create_reminder", self.client.post(url).json(reminder))
            .await
    }

    async fn update_reminder(&self, id: &ReminderId, update: &ReminderUpdate) -> Result<Reminder> {
        let url = self.config.endpoint(&["reminders", id.as_str()])?;
        self.send_json("update_reminder", self.client.patch(url).json(update))
            .await
    }

    async fn delete_reminder(&self, id: &ReminderId) -> Result<()> {
        let url = self.config.endpoint(&["reminders", id.as_str()])?;
        self.send("delete_reminder", self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_reminders(&self, chat_id: Option<ChatId>) -> Result<Vec<Reminder>> {
        let mut url = self.config.endpoint(&["reminders"])?;
        if let Some(chat_id) = chat_id {
            url.query_pairs_mut()
                .append_pair("chatId", &chat_id.to_string());
        }
        self.send_json("list_reminders", self.client.get(url)).await
    }
}
