//! HTTP client for the marketplace API.
//!
//! [`ApiClient`] issues requests against the configured base URL with a fixed
//! timeout, normalizes transport failures into [`Error`] and validates every
//! response envelope. It never retries; retry is a user decision surfaced by
//! the list synchronizer.

mod bookings;
mod envelope;

use std::fmt;
use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;

pub use envelope::{parse_ack, parse_envelope, ENVELOPE_VERSION};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{ListingItem, SessionContext};
use crate::payload::ListingPayload;
use crate::util::compact_text;

/// Source of listing pages.
///
/// Implemented by [`ApiClient`] for real traffic and by in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait ListingTransport {
    /// `POST` `payload` to the listing endpoint at `path` and return its items.
    async fn fetch_page(&self, path: &str, payload: &ListingPayload) -> Result<Vec<ListingItem>>;
}

/// reqwest-backed marketplace client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, context: &SessionContext) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| Error::Config(format!("failed to build HTTP client: {error}")))?;
        Ok(Self {
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout,
            access_token: context.access_token().map(ToString::to_string),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let mut request = request.header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| self.transport_error(&error))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| self.transport_error(&error))?;

        if !status.is_success() {
            return Err(Error::Server(parse_api_error(status, &body)));
        }
        Ok(body)
    }

    fn transport_error(&self, error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Network(error.to_string())
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl ListingTransport for ApiClient {
    async fn fetch_page(&self, path: &str, payload: &ListingPayload) -> Result<Vec<ListingItem>> {
        tracing::debug!(path, page = ?payload.page(), "Fetching listing page");
        let body = self.send(self.client.post(self.url(path)).json(payload)).await?;
        parse_envelope(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} (HTTP {})", compact_text(&message), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} (HTTP {})", trimmed, status.as_u16())
    }
}
