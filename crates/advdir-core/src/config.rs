use crate::settings::HttpSettings;
use crate::ConfigError;

/// Load HTTP transport settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric variable does not parse.
pub fn load_http_settings() -> Result<HttpSettings, ConfigError> {
    dotenvy::dotenv().ok();
    load_http_settings_from_env()
}

/// Load HTTP transport settings from environment variables already in the
/// process, without reading `.env` files.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric variable does not parse.
pub fn load_http_settings_from_env() -> Result<HttpSettings, ConfigError> {
    build_http_settings(|key| std::env::var(key))
}

/// Build settings using the provided env-var lookup function.
///
/// Every variable is optional; absent variables take the
/// [`HttpSettings::default`] value.
fn build_http_settings<F>(lookup: F) -> Result<HttpSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = HttpSettings::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let request_timeout_secs =
        parse_u64("ADVDIR_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADVDIR_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("ADVDIR_USER_AGENT", &defaults.user_agent);
    let max_retries = parse_u32("ADVDIR_MAX_RETRIES", defaults.max_retries)?;
    let retry_backoff_base_secs = parse_u64(
        "ADVDIR_RETRY_BACKOFF_BASE_SECS",
        defaults.retry_backoff_base_secs,
    )?;
    let log_level = or_default("ADVDIR_LOG_LEVEL", &defaults.log_level);

    Ok(HttpSettings {
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
