//! Provider configuration.
//!
//! Connection settings for the firewall API, deserialized from the provider
//! block of the host tool and validated before any client is built.

use crate::client::{ClientConfig, DEFAULT_API_URL, FIREWALL_API_DEFAULT_TIMEOUT};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for the firewall provider.
#[derive(Debug, Deserialize, Validate)]
pub struct ProviderConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token used for every request
    #[serde(default, deserialize_with = "deserialize_token")]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    FIREWALL_API_DEFAULT_TIMEOUT
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()).map(SecretString::from))
}

impl ProviderConfig {
    /// Create a new provider configuration for the given API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        };

        config.validate().map_err(|e| {
            Error::ConfigError(format!("Invalid configuration: {e}"))
        })?;

        Ok(config)
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Expose the token for attaching to a request header.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret())
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub const fn client_config(&self) -> ClientConfig {
        ClientConfig::new().with_timeout(self.timeout())
    }

    /// Parse and validate the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_url).map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
