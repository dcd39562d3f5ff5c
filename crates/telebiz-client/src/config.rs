//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, Result};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "TELEBIZ_API_URL";

/// Environment variable holding the bearer token.
pub const API_TOKEN_ENV: &str = "TELEBIZ_API_TOKEN";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Parses `base_url`, mapping failures to [`ClientError::Configuration`].
    pub fn parse(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid API URL '{}': {}", base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "API URL '{}' cannot be used as a base",
                base_url
            )));
        }
        Ok(Self::new(url))
    }

    /// Reads `TELEBIZ_API_URL` and, if set, `TELEBIZ_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(API_URL_ENV).map_err(|_| {
            ClientError::Configuration(format!("Missing {} environment variable", API_URL_ENV))
        })?;
        let mut config = Self::parse(&url)?;
        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL extended with `segments`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_defaults() {
        let config = ClientConfig::parse("https://api.telebiz.test/v1").unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = ClientConfig::parse("not a url").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(ClientConfig::parse("mailto:ops@telebiz.test").is_err());
    }

    #[test]
    fn test_endpoint_joining() {
        let config = ClientConfig::parse("https://api.telebiz.test/v1/").unwrap();
        assert_eq!(
            config.endpoint(&["reminders", "rem-1"]).unwrap().as_str(),
            "https://api.telebiz.test/v1/reminders/rem-1"
        );

        let config = ClientConfig::parse("https://api.telebiz.test").unwrap();
        assert_eq!(
            config.endpoint(&["entities"]).unwrap().as_str(),
            "https://api.telebiz.test/entities"
        );
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::parse("http://localhost:8080")
            .unwrap()
            .with_token("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
