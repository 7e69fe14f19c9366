use thiserror::Error;

/// Errors raised while fetching or signing a provider catalog request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A credential could not be encoded into a request header.
    #[error("invalid header value for provider {provider_id}: {reason}")]
    InvalidHeader { provider_id: String, reason: String },
}
