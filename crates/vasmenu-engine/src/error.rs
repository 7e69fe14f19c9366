use thiserror::Error;

/// Errors surfaced by the catalog engine to its callers.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller named a provider the registry does not know. Raised at the
    /// call site rather than silently swallowed.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}
