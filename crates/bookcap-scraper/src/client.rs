use std::time::Duration;

use bookcap_core::CaptureRecord;
use reqwest::Client;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// HTTP client for the two sides of a capture: fetching product pages and
/// submitting finished records to the ingestion endpoint.
///
/// Rate limiting (429), not-found (404), and other non-2xx responses are
/// surfaced as typed errors. Transient errors (429, network failures) are
/// automatically retried with exponential backoff up to `max_retries`
/// additional attempts.
pub struct CaptureClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `base * 2^attempt`.
    backoff_base_secs: u64,
}

impl CaptureClient {
    /// Creates a `CaptureClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors; `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches a product page and returns its HTML body, with automatic
    /// retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScrapeError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScrapeError::Http`] — network or TLS failure after all retries exhausted.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                Self::check_status(&response, &url)?;
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// POSTs a finished capture record as JSON to the ingestion endpoint,
    /// with automatic retry on transient errors.
    ///
    /// The response body is not interpreted; any 2xx status counts as
    /// accepted.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_page`].
    pub async fn submit_capture(
        &self,
        api_url: &str,
        record: &CaptureRecord,
    ) -> Result<(), ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let api_url = api_url.to_owned();
            async move {
                let response = self.client.post(&api_url).json(record).send().await?;
                Self::check_status(&response, &api_url)?;
                Ok(())
            }
        })
        .await
    }

    /// Maps a non-2xx response to its typed error; passes 2xx through.
    fn check_status(response: &reqwest::Response, url: &str) -> Result<(), ScrapeError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScrapeError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScrapeError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(())
    }
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_domain(url: &str) -> String {
    // Strip scheme and take up to the first `/`.
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}
