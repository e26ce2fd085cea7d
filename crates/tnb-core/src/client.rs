//! JSON fetch capability consumed by cursors, plus its HTTP implementation.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

/// Failure classes of a node request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    Transport,
    Unauthorized,
    Forbidden,
    NotFound,
    NetworkServerError,
    Http { status: u16 },
    InvalidJson,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    kind: ClientErrorKind,
    message: String,
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Transport, message)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::InvalidJson, message)
    }

    /// Classifies a non-2xx response. The body is kept as the message.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let kind = match status {
            401 => ClientErrorKind::Unauthorized,
            403 => ClientErrorKind::Forbidden,
            404 => ClientErrorKind::NotFound,
            503 => ClientErrorKind::NetworkServerError,
            status => ClientErrorKind::Http { status },
        };
        Self::new(kind, body)
    }

    fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        match self.kind {
            ClientErrorKind::Unauthorized => Some(401),
            ClientErrorKind::Forbidden => Some(403),
            ClientErrorKind::NotFound => Some(404),
            ClientErrorKind::NetworkServerError => Some(503),
            ClientErrorKind::Http { status } => Some(status),
            ClientErrorKind::Transport | ClientErrorKind::InvalidJson => None,
        }
    }

    /// Whether repeating the same request could succeed.
    pub const fn retryable(&self) -> bool {
        match self.kind {
            ClientErrorKind::Transport | ClientErrorKind::NetworkServerError => true,
            ClientErrorKind::Http { status } => status == 429 || status >= 500,
            _ => false,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ClientErrorKind::Transport => "client.transport",
            ClientErrorKind::Unauthorized => "client.unauthorized",
            ClientErrorKind::Forbidden => "client.forbidden",
            ClientErrorKind::NotFound => "client.not_found",
            ClientErrorKind::NetworkServerError => "client.network_server_error",
            ClientErrorKind::Http { .. } => "client.http",
            ClientErrorKind::InvalidJson => "client.invalid_json",
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status() {
            Some(status) => write!(f, "HTTP {status}: {} ({})", self.message, self.code()),
            None => write!(f, "{} ({})", self.message, self.code()),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<HttpError> for ClientError {
    fn from(error: HttpError) -> Self {
        Self::transport(error.message())
    }
}

pub type JsonFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, ClientError>> + Send + 'a>>;

/// Fetches one JSON document. Cursors only depend on this seam.
pub trait JsonClient: Send + Sync {
    fn fetch_json<'a>(&'a self, url: &'a str, query: &'a [(String, String)]) -> JsonFuture<'a>;
}

/// [`JsonClient`] over an [`HttpClient`] transport with retries.
#[derive(Clone)]
pub struct HttpJsonClient {
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl HttpJsonClient {
    pub fn new(http: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// reqwest transport configured from `TNB_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, url: &str, query: &[(String, String)]) -> HttpRequest {
        HttpRequest::get(url)
            .with_query(query.iter().cloned())
            .with_header("user-agent", self.config.user_agent.as_str())
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms)
    }

    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            let outcome = self.http.execute(request.clone()).await;
            let retry_reason = match &outcome {
                Ok(response) if retry.should_retry_status(response.status) => {
                    Some(format!("status {}", response.status))
                }
                Err(error) if retry.should_retry_error(error) => Some(error.message().to_owned()),
                _ => None,
            };
            let Some(retry_reason) = retry_reason.filter(|_| retry.allows_retry(attempt)) else {
                return outcome.map_err(ClientError::from);
            };

            let delay = retry.delay_for_attempt(attempt);
            warn!(
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                reason = %retry_reason,
                "retrying node request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl JsonClient for HttpJsonClient {
    fn fetch_json<'a>(&'a self, url: &'a str, query: &'a [(String, String)]) -> JsonFuture<'a> {
        Box::pin(async move {
            let request = self.request(url, query);
            debug!(url = %request.full_url(), "fetching page");

            let response = self.execute_with_retry(request).await?;
            if !response.is_success() {
                warn!(url, status = response.status, "node returned an error status");
                return Err(ClientError::from_status(response.status, response.body));
            }

            serde_json::from_str(&response.body)
                .map_err(|error| ClientError::invalid_json(format!("{url}: {error}")))
        })
    }
}
