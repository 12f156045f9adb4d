pub mod config;
pub mod province;
pub mod record;
pub mod run_config;
pub mod settings;

pub use config::{load_http_settings, load_http_settings_from_env};
pub use province::Province;
pub use record::AdvisorRecord;
pub use run_config::{parse_delay_secs, OutputColumns, RunConfig};
pub use settings::HttpSettings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
