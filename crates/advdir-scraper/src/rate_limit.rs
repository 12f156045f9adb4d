//! Bounded retry for page fetches.
//!
//! Only transient failures are retried: 429 responses, 5xx responses, and
//! transport errors. A 404 or other 4xx would get the same answer again.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_transient(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Wait before retry number `retry` (zero-based): `base * 2^retry` seconds.
fn backoff(backoff_base_secs: u64, retry: u32) -> Duration {
    Duration::from_secs(backoff_base_secs.saturating_mul(1u64 << retry.min(62)))
}

/// Runs `fetch` once, then up to `max_retries` more times while it keeps
/// failing transiently, sleeping [`backoff`] between attempts.
///
/// Returns the first success or the last error.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut fetch: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match fetch().await {
            Ok(page) => return Ok(page),
            Err(err) if retry < max_retries && is_transient(&err) => err,
            Err(err) => return Err(err),
        };

        let wait = backoff(backoff_base_secs, retry);
        tracing::warn!(
            retry = retry + 1,
            max_retries,
            wait_secs = wait.as_secs(),
            error = %err,
            "transient fetch error, retrying"
        );
        tokio::time::sleep(wait).await;
        retry += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::ready;

    use super::*;

    const PAGE_URL: &str = "https://www.nbfwm.ca/advisor/t/our-team/jane-doe.html";

    fn status(code: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: code,
            url: PAGE_URL.to_owned(),
        }
    }

    /// Replays `responses` in order and returns the outcome plus the number
    /// of fetch attempts made.
    async fn replay(
        max_retries: u32,
        responses: Vec<Result<&'static str, ScraperError>>,
    ) -> (Result<&'static str, ScraperError>, usize) {
        let mut script = VecDeque::from(responses);
        let mut attempts = 0;
        let result = retry_with_backoff(max_retries, 0, || {
            attempts += 1;
            ready(script.pop_front().expect("script exhausted"))
        })
        .await;
        (result, attempts)
    }

    #[test]
    fn backoff_doubles_per_retry() {
        assert_eq!(backoff(2, 0), Duration::from_secs(2));
        assert_eq!(backoff(2, 1), Duration::from_secs(4));
        assert_eq!(backoff(2, 3), Duration::from_secs(16));
        assert_eq!(backoff(0, 5), Duration::ZERO);
        assert_eq!(backoff(u64::MAX, 70), Duration::from_secs(u64::MAX));
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, attempts) = replay(3, vec![Ok("<h1>Jane</h1>")]).await;
        assert_eq!(result.unwrap(), "<h1>Jane</h1>");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn rate_limits_and_server_errors_are_retried() {
        let rate_limited = ScraperError::RateLimited {
            domain: "www.nbfwm.ca".to_owned(),
            retry_after_secs: 0,
        };
        let (result, attempts) =
            replay(3, vec![Err(rate_limited), Err(status(502)), Ok("<h1>Jane</h1>")]).await;
        assert_eq!(result.unwrap(), "<h1>Jane</h1>");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn last_error_is_returned_when_retries_run_out() {
        let (result, attempts) =
            replay(1, vec![Err(status(500)), Err(status(503))]).await;
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn client_errors_fail_immediately() {
        let not_found = ScraperError::NotFound {
            url: PAGE_URL.to_owned(),
        };
        let (result, attempts) = replay(3, vec![Err(not_found)]).await;
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
        assert_eq!(attempts, 1);

        let (result, attempts) = replay(3, vec![Err(status(403))]).await;
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 403, .. })
        ));
        assert_eq!(attempts, 1);
    }
}
