/// HTTP transport settings shared by every request of a run.
///
/// Loaded from the environment by [`crate::load_http_settings`]; every
/// field has a default so an empty environment is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub retry_backoff_base_secs: u64,
    pub log_level: String,
}

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; advdir/0.1; advisor-directory-extractor)";

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 1,
            retry_backoff_base_secs: 2,
            log_level: "info".to_string(),
        }
    }
}
