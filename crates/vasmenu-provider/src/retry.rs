//! Fixed-delay retry for transient catalog-fetch failures.
//!
//! [`retry_fixed`] wraps a fallible async operation and retries transport
//! errors (network failures, timeouts, non-2xx responses) up to a bounded
//! attempt count with a fixed sleep between attempts. Non-transient errors
//! — a body that is not JSON, an unencodable credential — are returned
//! immediately: retrying cannot fix them.

use std::future::Future;
use std::time::Duration;

use crate::error::ProviderError;

/// Returns `true` for errors worth retrying after the fixed delay.
pub(crate) fn is_retriable(err: &ProviderError) -> bool {
    match err {
        ProviderError::Http(_) | ProviderError::UnexpectedStatus { .. } => true,
        ProviderError::Deserialize { .. } | ProviderError::InvalidHeader { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, sleeping `delay_ms` between attempts.
///
/// A provider that fails every attempt is tried exactly `1 + max_retries`
/// times in total. Non-retriable errors short-circuit.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-retriable error encountered.
pub async fn retry_fixed<T, F, Fut>(
    max_retries: u32,
    delay_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient catalog fetch error — retrying after fixed delay"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
