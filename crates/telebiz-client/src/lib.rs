//! Telebiz Client - access to the Telebiz entity and reminder backend.
//!
//! - **api**: `EntityApi` / `ReminderApi` traits
//! - **http**: reqwest implementation of both
//! - **config**: base URL, token and timeout
//! - **error**: `ClientError` and validation payload unpacking

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{EntityApi, ReminderApi};
pub use config::{ClientConfig, API_TOKEN_ENV, API_URL_ENV};
pub use error::{unpack_validation_error, ClientError, Result, ValidationPayload};
pub use http::HttpClient;
