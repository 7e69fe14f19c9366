pub mod app_config;
pub mod config;
pub mod money;
pub mod product;
pub mod providers;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::format_price;
pub use product::{Product, EXPIRES_AT_KEY, FALLBACK_CATEGORY, FEATURED_TAG};
pub use providers::{
    load_providers, ProviderConnection, ProviderEndpoints, ProviderRegistry, ProvidersFile,
};

use thiserror::Error;

/// Errors raised while loading application or provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read providers file {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse providers file: {0}")]
    ProvidersFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
