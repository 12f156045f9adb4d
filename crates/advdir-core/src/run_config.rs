//! Per-run extraction parameters supplied by the caller.

use std::time::Duration;

use crate::{ConfigError, Province};

pub const DEFAULT_BASE_URL: &str = "https://www.nbfwm.ca";
pub const DEFAULT_SEED_PATH: &str = "/advisor.html";
pub const DEFAULT_CRAWL_PAGE_LIMIT: usize = 250;

/// Optional columns appended to the CSV after the fixed
/// `name, email, phone, team_name, province` set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputColumns {
    pub city: bool,
    pub address_hint: bool,
    pub profile_url: bool,
}

/// Parameters for one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub base_url: String,
    pub seed_path: String,
    /// Keep only records resolved to this province.
    pub province: Option<Province>,
    /// Keep only records whose city or address hint contains this text.
    pub city_contains: Option<String>,
    /// Politeness delay after every request.
    pub delay: Duration,
    /// `0` means no limit.
    pub max_profiles: usize,
    pub deep_crawl: bool,
    pub crawl_page_limit: usize,
    pub columns: OutputColumns,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            seed_path: DEFAULT_SEED_PATH.to_string(),
            province: Some(Province::Quebec),
            city_contains: None,
            delay: Duration::from_millis(250),
            max_profiles: 0,
            deep_crawl: false,
            crawl_page_limit: DEFAULT_CRAWL_PAGE_LIMIT,
            columns: OutputColumns::default(),
        }
    }
}

impl RunConfig {
    /// Absolute URL of the seed directory page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the base URL does not parse
    /// or the seed path cannot be joined onto it.
    pub fn seed_url(&self) -> Result<String, ConfigError> {
        let base = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: format!("\"{}\": {e}", self.base_url),
        })?;
        let seed = base
            .join(&self.seed_path)
            .map_err(|e| ConfigError::InvalidValue {
                field: "seed_path",
                reason: format!("\"{}\": {e}", self.seed_path),
            })?;
        Ok(seed.to_string())
    }

    /// The city filter with surrounding whitespace removed, or `None` when
    /// unset or blank.
    #[must_use]
    pub fn city_filter(&self) -> Option<&str> {
        self.city_contains
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Checks the run parameters for values the pipeline cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: format!("\"{}\": {e}", self.base_url),
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: format!("\"{}\" is not an http(s) URL with a host", self.base_url),
            });
        }
        if !self.seed_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "seed_path",
                reason: format!("\"{}\" must start with '/'", self.seed_path),
            });
        }
        if self.deep_crawl && self.crawl_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawl_page_limit",
                reason: "must be at least 1 when deep crawl is enabled".to_string(),
            });
        }
        Ok(())
    }

    /// Default CSV file name for this run's province filter.
    #[must_use]
    pub fn default_output_file(&self) -> String {
        match self.province {
            Some(p) => format!(
                "nbfwm_{}_advisors.csv",
                p.english_name().to_lowercase().replace(' ', "_")
            ),
            None => "nbfwm_advisors.csv".to_string(),
        }
    }
}

/// Parses a politeness delay given in (fractional) seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for negative, non-finite, or
/// unparsable input.
pub fn parse_delay_secs(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        field: "delay",
        reason: format!("\"{raw}\": {e}"),
    })?;
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
        field: "delay",
        reason: format!("\"{raw}\": {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.province, Some(Province::Quebec));
        assert_eq!(cfg.crawl_page_limit, 250);
    }

    #[test]
    fn seed_url_joins_base_and_path() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.seed_url().unwrap(), "https://www.nbfwm.ca/advisor.html");
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let cfg = RunConfig {
            base_url: "not a url".to_string(),
            ..RunConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "base_url", .. })
        ));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let cfg = RunConfig {
            base_url: "ftp://www.nbfwm.ca".to_string(),
            ..RunConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "base_url", .. })
        ));
    }

    #[test]
    fn validate_rejects_relative_seed_path() {
        let cfg = RunConfig {
            seed_path: "advisor.html".to_string(),
            ..RunConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "seed_path", .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_crawl_limit_only_when_crawling() {
        let mut cfg = RunConfig {
            crawl_page_limit: 0,
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_ok());
        cfg.deep_crawl = true;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "crawl_page_limit", .. })
        ));
    }

    #[test]
    fn city_filter_ignores_blank() {
        let mut cfg = RunConfig {
            city_contains: Some("   ".to_string()),
            ..RunConfig::default()
        };
        assert_eq!(cfg.city_filter(), None);
        cfg.city_contains = Some(" Laval ".to_string());
        assert_eq!(cfg.city_filter(), Some("Laval"));
    }

    #[test]
    fn default_output_file_names() {
        let mut cfg = RunConfig::default();
        assert_eq!(cfg.default_output_file(), "nbfwm_quebec_advisors.csv");
        cfg.province = Some(Province::BritishColumbia);
        assert_eq!(cfg.default_output_file(), "nbfwm_british_columbia_advisors.csv");
        cfg.province = None;
        assert_eq!(cfg.default_output_file(), "nbfwm_advisors.csv");
    }

    #[test]
    fn parse_delay_secs_accepts_fractions() {
        assert_eq!(parse_delay_secs("0.25").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_delay_secs("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_delay_secs_rejects_negative_and_garbage() {
        assert!(parse_delay_secs("-1").is_err());
        assert!(parse_delay_secs("soon").is_err());
        assert!(parse_delay_secs("inf").is_err());
    }
}
