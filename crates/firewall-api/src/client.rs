//! Asynchronous firewall API client implementation.

use crate::models::{Firewall, FirewallEnvelope, FirewallRequest};
use crate::Result;
use async_trait::async_trait;
use firewall_core::client::ClientConfig;
use firewall_core::config::ProviderConfig;
use firewall_core::{Error, FirewallId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("firewall-api/", env!("CARGO_PKG_VERSION"));

const FIREWALLS_PATH: &str = "v2/firewalls";

/// Remote operations the firewall resource needs.
///
/// A missing firewall is reported as [`Error::NotFound`] by `get_firewall`
/// and `delete_firewall`.
#[async_trait]
pub trait FirewallApi: Send + Sync {
    /// Create a firewall.
    async fn create_firewall(&self, request: &FirewallRequest) -> Result<Firewall>;

    /// Fetch a firewall by ID.
    async fn get_firewall(&self, id: FirewallId) -> Result<Firewall>;

    /// Replace the configuration of an existing firewall.
    async fn update_firewall(&self, id: FirewallId, request: &FirewallRequest)
        -> Result<Firewall>;

    /// Delete a firewall.
    async fn delete_firewall(&self, id: FirewallId) -> Result<()>;
}

/// Builder for [`FirewallApiClient`].
#[derive(Debug)]
pub struct FirewallApiClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    token: Option<SecretString>,
}

impl FirewallApiClientBuilder {
    /// Create a new builder from the provided base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid firewall API base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            token: None,
        })
    }

    /// Create a builder from validated provider configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let mut builder = Self {
            base_url: config.parse_api_url()?,
            http_config: config.client_config(),
            token: None,
        };
        if let Some(token) = config.token() {
            builder = builder.with_token(token);
        }
        Ok(builder)
    }

    /// Configure the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Build the client instance.
    pub fn build(self) -> Result<FirewallApiClient> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|err| Error::ConfigError(format!("Invalid API token: {err}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build firewall API HTTP client: {err}"))
        })?;

        Ok(FirewallApiClient {
            http,
            base_url: self.base_url,
        })
    }
}

/// Asynchronous client for the firewall API.
#[derive(Clone)]
pub struct FirewallApiClient {
    http: Client,
    base_url: Url,
}

impl FirewallApiClient {
    /// Construct directly from a base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        FirewallApiClientBuilder::new(base_url)?.build()
    }

    /// Construct from provider configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        FirewallApiClientBuilder::from_config(config)?.build()
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);
        self.base_url.join(normalized).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid firewall API path `{path}`: {err}"))
        })
    }

    async fn send_json<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let mut request = self.http.request(method.clone(), url);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        info!(%method, path, "Firewall API request");

        let response = request.send().await.map_err(Error::from)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::HttpError(format!("Failed to read firewall API response body: {err}"))
        })?;

        if status.is_success() {
            return deserialize_body(path, status, &bytes);
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!(%status, path, "Firewall API request failed");
        Err(map_status_to_error(status, text))
    }
}

#[async_trait]
impl FirewallApi for FirewallApiClient {
    async fn create_firewall(&self, request: &FirewallRequest) -> Result<Firewall> {
        self.send_json::<_, FirewallEnvelope>(Method::POST, FIREWALLS_PATH, Some(request))
            .await
            .map(|envelope| envelope.firewall)
    }

    async fn get_firewall(&self, id: FirewallId) -> Result<Firewall> {
        let path = format!("{FIREWALLS_PATH}/{id}");
        self.send_json::<(), FirewallEnvelope>(Method::GET, &path, None)
            .await
            .map(|envelope| envelope.firewall)
    }

    async fn update_firewall(
        &self,
        id: FirewallId,
        request: &FirewallRequest,
    ) -> Result<Firewall> {
        let path = format!("{FIREWALLS_PATH}/{id}");
        self.send_json::<_, FirewallEnvelope>(Method::PUT, &path, Some(request))
            .await
            .map(|envelope| envelope.firewall)
    }

    async fn delete_firewall(&self, id: FirewallId) -> Result<()> {
        let path = format!("{FIREWALLS_PATH}/{id}");
        self.send_json::<(), serde_json::Value>(Method::DELETE, &path, None)
            .await
            .map(|_| ())
    }
}

fn deserialize_body<R>(path: &str, status: StatusCode, bytes: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        serde_json::from_value(serde_json::Value::Null).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse empty firewall API response for `{path}`: {err}"
            ))
        })
    } else {
        serde_json::from_slice(bytes).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse firewall API response for `{path}`: {err}"
            ))
        })
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("Firewall API authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::UNPROCESSABLE_ENTITY => Error::ValidationError(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Firewall API temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Firewall API server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Firewall API error {status}: {text}")),
    }
}
