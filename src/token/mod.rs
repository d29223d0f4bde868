//! Retrieval of the access token issued by the host application's token service.
//!
//! The service answers a single `GET` with a JSON body `{ "token": "..." }` on success or
//! `{ "errorMessage": "..." }` when it refuses to hand out a token. The body is validated here
//! and turned into a [`TokenResponse`] before the rest of the pipeline sees it.

use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{internal_error, invalid_response, EmbedError, EmbedResult};

/// OAuth access token handed to the analytics library. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Outcome reported by the token service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResponse {
    Granted(AccessToken),
    Rejected(String),
}

impl TokenResponse {
    /// Converts the raw JSON body. `errorMessage` takes precedence over `token`.
    pub fn from_body(body: &str) -> EmbedResult<Self> {
        let parsed: ServiceResponse = serde_json::from_str(body)
            .map_err(|err| invalid_response(format!("invalid token service response: {err}")))?;

        if let Some(message) = parsed.error_message.filter(|message| !message.is_empty()) {
            return Ok(TokenResponse::Rejected(message));
        }
        match parsed.token.filter(|token| !token.is_empty()) {
            Some(token) => Ok(TokenResponse::Granted(AccessToken::new(token))),
            None => Err(EmbedError::AuthenticationFailed {
                message: "Service response did not include a token".to_string(),
            }),
        }
    }

    pub fn into_token(self) -> EmbedResult<AccessToken> {
        match self {
            TokenResponse::Granted(token) => Ok(token),
            TokenResponse::Rejected(message) => Err(EmbedError::AuthenticationFailed { message }),
        }
    }
}

#[derive(Deserialize)]
struct ServiceResponse {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    token: Option<String>,
}

/// Source of the one-shot access token.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self, service_url: &Url) -> EmbedResult<TokenResponse>;
}

/// Fetches the token from the configured service URL with one HTTP request.
#[derive(Clone, Debug)]
pub struct ServiceTokenSource {
    client: Client,
}

impl ServiceTokenSource {
    pub fn new() -> EmbedResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }

    /// Native only: bounds the single token request. The browser build relies on the user
    /// agent's own limits.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout(timeout: Duration) -> EmbedResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TokenSource for ServiceTokenSource {
    async fn fetch(&self, service_url: &Url) -> EmbedResult<TokenResponse> {
        let response = self
            .client
            .get(service_url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| EmbedError::TokenRequestFailed {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EmbedError::TokenRequestFailed {
                message: format!("unreadable response body: {err}"),
            })?;
        if status.is_success() {
            return TokenResponse::from_body(&body);
        }

        log::debug!("token service answered with status {status}");
        match TokenResponse::from_body(&body) {
            Err(EmbedError::InvalidResponse { .. }) => Err(EmbedError::TokenRequestFailed {
                message: format!("token service answered with status {status}"),
            }),
            parsed => parsed,
        }
    }
}
