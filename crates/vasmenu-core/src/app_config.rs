use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings. Per-provider settings live in the providers
/// file; see [`crate::providers`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub providers_path: PathBuf,
    pub user_agent: String,
    /// Cap on products per category bucket in a generated menu.
    pub max_per_category: usize,
    /// Cap on the featured shelf in a generated menu.
    pub max_featured: usize,
}
