//! `reqwest` implementation of [`LedgerSource`].

use std::time::Duration;

use async_trait::async_trait;
use metas_core::ledger::{
    LedgerFetchError, LedgerQuery, LedgerResponse, LedgerSource, parse_error_envelope,
    parse_ledger_response,
};
use metas_shared::config::LedgerServiceConfig;
use serde_json::Value;
use tracing::debug;

use crate::error::GatewayError;

/// Path of the rollup endpoint, relative to the service base URL.
pub const ROLLUP_PATH: &str = "/ledger/rollup";

/// Budget service client answering rollup lookups over HTTP.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpLedgerSource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_token: Option<String>,
}

impl HttpLedgerSource {
    /// Creates a client for `base_url` with no timeout and no token.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::build(base_url, None, None)
    }

    /// Creates a client from the `ledger` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &LedgerServiceConfig) -> Result<Self, GatewayError> {
        Self::build(
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
            config.api_token.clone(),
        )
    }

    /// Creates a source for `base_url` that sends lookups through an existing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, GatewayError> {
        Ok(Self {
            client,
            endpoint: rollup_endpoint(base_url)?,
            api_token: None,
        })
    }

    /// Sends `token` as a bearer token with every lookup.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Full URL lookups are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn build(
        base_url: &str,
        timeout: Option<Duration>,
        api_token: Option<String>,
    ) -> Result<Self, GatewayError> {
        let endpoint = rollup_endpoint(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            endpoint,
            api_token: api_token.filter(|t| !t.is_empty()),
        })
    }
}

fn rollup_endpoint(base_url: &str) -> Result<reqwest::Url, GatewayError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(&format!("{trimmed}{ROLLUP_PATH}")).map_err(|e| {
        GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        }
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn transport_error(err: &reqwest::Error) -> LedgerFetchError {
    if err.is_timeout() {
        LedgerFetchError::Transport("request timed out".to_string())
    } else {
        LedgerFetchError::Transport(err.to_string())
    }
}

#[async_trait]
impl LedgerSource for HttpLedgerSource {
    async fn fetch(&self, query: &LedgerQuery) -> Result<LedgerResponse, LedgerFetchError> {
        let mut request = self.client.post(self.endpoint.clone()).json(query);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        debug!(
            %status,
            body_len = body.len(),
            area_id = %query.area_id,
            year = query.year,
            "Ledger service response"
        );

        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            return Err(parsed
                .ok()
                .as_ref()
                .and_then(parse_error_envelope)
                .unwrap_or(LedgerFetchError::Status {
                    status: status.as_u16(),
                }));
        }

        let value = parsed.map_err(|e| LedgerFetchError::MalformedResponse(e.to_string()))?;
        parse_ledger_response(&value)
    }
}
