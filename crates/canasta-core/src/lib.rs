use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read overrides file {path}: {source}")]
    OverridesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse overrides file: {0}")]
    OverridesFileParse(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

pub mod app_config;
pub mod config;
pub mod overrides;
pub mod quantity;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use overrides::{load_overrides, OverrideRule, OverrideTable};
pub use quantity::{ComparableType, ComparePreference, Measurement, Quantity};
