//! HTTP client for Socrata open-data resources
//!
//! Pages are requested with the Socrata `$limit` / `$offset` query parameters.
//! Retries are off unless `source.retry.max_retries` is raised.

use super::source::PermitSource;
use crate::config::SourceConfig;
use crate::domain::{PermitError, RawRecord, Result, SourceError};
use crate::log_retry_attempt;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Header carrying the Socrata application token
const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Socrata resource client
///
/// # Example
///
/// ```no_run
/// use permit_etl::adapters::socrata::SocrataClient;
/// use permit_etl::config::SourceConfig;
///
/// let client = SocrataClient::new(SourceConfig::default()).expect("client");
/// ```
pub struct SocrataClient {
    client: Client,
    config: SourceConfig,
}

impl SocrataClient {
    /// Create a new client from the source configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PermitError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Issue one page request without retry
    async fn request_page(&self, offset: u64, limit: u64) -> Result<Vec<RawRecord>> {
        let mut request = self
            .client
            .get(&self.config.endpoint)
            .query(&[("$limit", limit), ("$offset", offset)])
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.config.user_agent);

        if let Some(token) = &self.config.app_token {
            request = request.header(APP_TOKEN_HEADER, token.expose_secret().as_ref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::ConnectionFailed(e.to_string())
            }
        })?;

        parse_page(&body)
    }

    /// Retry a request with exponential backoff
    ///
    /// Only errors classified as retryable are retried, at most
    /// `retry.max_retries` times after the first attempt.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let retryable = matches!(&e, PermitError::Source(s) if s.is_retryable());
                    if !retryable || attempt >= retry.max_retries {
                        return Err(e);
                    }

                    attempt += 1;
                    let delay_ms = retry.delay_ms(attempt);

                    log_retry_attempt!(attempt, retry.max_retries, %e);
                    tracing::debug!(delay_ms = delay_ms, "Backing off before retry");

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl PermitSource for SocrataClient {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Option<Vec<RawRecord>>> {
        tracing::debug!(
            endpoint = %self.config.endpoint,
            offset = offset,
            limit = limit,
            "Fetching page"
        );

        let page = self
            .retry_request(|| self.request_page(offset, limit))
            .await?;

        if page.is_empty() {
            return Ok(None);
        }

        Ok(Some(page))
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Parse a response body into a page of flat records
fn parse_page(body: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::InvalidResponse(format!("body is not JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(SourceError::InvalidResponse("body is not a JSON array".to_string()).into());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(SourceError::InvalidResponse(format!(
                "element {index} is not an object: {other}"
            ))
            .into()),
        })
        .collect()
}
