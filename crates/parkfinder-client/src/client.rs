//! HTTP client for the activity service's `load_more` endpoint.
//!
//! The service keeps the submitted search in its own session, so a request
//! only carries the page cursor. Responses are normalized into
//! [`ResultsPage`]s ready for [`parkfinder_core::ResultsAggregator::append_page`].

use std::time::Duration;

use parkfinder_core::{AppConfig, ResultsPage};
use reqwest::{Client, Url};

use crate::error::ClientError;
use crate::normalize::normalize_page;
use crate::retry::retry_with_backoff;
use crate::types::{ErrorBody, LoadMoreRequest, LoadMoreResponse};

/// Client for `POST {base}/load_more`.
///
/// Maps 429 to [`ClientError::RateLimited`], 4xx rejections carrying an
/// `error` message to [`ClientError::Api`], and any other non-2xx status to
/// [`ClientError::UnexpectedStatus`]. Transient errors are retried with
/// exponential back-off up to `max_retries` additional attempts.
pub struct ActivityClient {
    client: Client,
    load_more_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ActivityClient {
    /// Creates a client with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let load_more_url = Url::parse(&normalised)
            .and_then(|base| base.join("load_more"))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            load_more_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// Same as [`ActivityClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn load_more_url(&self) -> &Url {
        &self.load_more_url
    }

    /// Fetches the page at `cursor` and normalizes it.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`]: the service rejected the request
    ///   (e.g. no search in its session). Not retried.
    /// - [`ClientError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ClientError::UnexpectedStatus`]: other non-2xx (5xx retried).
    /// - [`ClientError::Http`]: network failure after all retries.
    /// - [`ClientError::Deserialize`]: body is not the expected JSON. Not retried.
    pub async fn load_more(&self, cursor: u32) -> Result<ResultsPage, ClientError> {
        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_page(cursor)
        })
        .await?;

        let page = normalize_page(cursor, response);
        tracing::debug!(
            cursor,
            activities = page.activities.len(),
            parks = page.activity_parks.len(),
            has_more = page.has_more,
            "loaded activity page"
        );
        Ok(page)
    }

    async fn request_page(&self, cursor: u32) -> Result<LoadMoreResponse, ClientError> {
        let url = self.load_more_url.clone();
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&LoadMoreRequest { page: cursor })
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        let body = response.text().await?;

        if !status.is_success() {
            if status.is_client_error() {
                if let Some(message) = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.error)
                {
                    return Err(ClientError::Api(message));
                }
            }
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let parsed = serde_json::from_str::<LoadMoreResponse>(&body).map_err(|e| {
            ClientError::Deserialize {
                context: format!("load_more page {cursor}"),
                source: e,
            }
        })?;

        if parsed.success == Some(false) {
            return Err(ClientError::Api(
                parsed
                    .error
                    .unwrap_or_else(|| "request was not successful".to_owned()),
            ));
        }

        Ok(parsed)
    }
}
