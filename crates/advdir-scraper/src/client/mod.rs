//! HTTP fetch capability for directory and profile pages.

use std::time::Duration;

use reqwest::Client;

use advdir_core::HttpSettings;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::urls::host_of;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Sequential HTML fetcher with a fixed identifying header set.
///
/// Every call to [`PageClient::fetch_html`] is followed by the politeness
/// delay, whether the fetch succeeded or not, so the remote host sees at
/// most one request per delay interval.
///
/// Transient errors (429, 5xx, network failures) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct PageClient {
    pub(super) client: Client,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
    pub(super) delay: Duration,
}

impl PageClient {
    /// Creates a `PageClient` from transport settings and a politeness delay.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &HttpSettings, delay: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.retry_backoff_base_secs,
            delay,
        })
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network failure or timeout after all retries.
    /// - [`ScraperError::InvalidUrl`]: `url` does not parse (not retried).
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching page");
        let result = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url)
        })
        .await;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
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
            return Err(ScraperError::RateLimited {
                domain: host_of(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
