//! Per-call authentication headers for provider catalog requests.
//!
//! Every outbound call carries the provider's API key as a bearer token, a
//! millisecond timestamp, and an HMAC-SHA256 signature of
//! `api_key + timestamp` keyed with the provider's shared secret. Building
//! the headers is a pure function of the connection and the supplied
//! timestamp, so tests can pin the timestamp and assert exact signatures.

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use sha2::Sha256;
use vasmenu_core::ProviderConnection;

use crate::error::ProviderError;

pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGNATURE_HEADER: &str = "x-signature";

type HmacSha256 = Hmac<Sha256>;

/// Lowercase-hex HMAC-SHA256 of `message` keyed with `secret`.
pub(crate) fn hmac_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Build the signed headers for one catalog call at `timestamp_ms`.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidHeader`] if the provider's API key
/// contains bytes that cannot appear in an HTTP header.
pub fn signed_headers(
    conn: &ProviderConnection,
    timestamp_ms: i64,
) -> Result<HeaderMap, ProviderError> {
    let invalid = |reason: String| ProviderError::InvalidHeader {
        provider_id: conn.id.clone(),
        reason,
    };

    let signature = hmac_hex(
        conn.api_secret.as_bytes(),
        format!("{}{timestamp_ms}", conn.api_key).as_bytes(),
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", conn.api_key))
            .map_err(|e| invalid(e.to_string()))?,
    );
    headers.insert(
        TIMESTAMP_HEADER,
        HeaderValue::from_str(&timestamp_ms.to_string()).map_err(|e| invalid(e.to_string()))?,
    );
    headers.insert(
        SIGNATURE_HEADER,
        HeaderValue::from_str(&signature).map_err(|e| invalid(e.to_string()))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use vasmenu_core::ProviderEndpoints;

    use super::*;

    fn test_conn() -> ProviderConnection {
        ProviderConnection {
            id: "kazpay".to_string(),
            name: "KazPay".to_string(),
            base_url: "https://api.kazpay.example".to_string(),
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            endpoints: ProviderEndpoints {
                products: "/v2/services".to_string(),
                pricing: None,
                availability: None,
            },
            categories: vec![],
            sync_interval_secs: 300,
            request_timeout_secs: 10,
            max_retries: 3,
            retry_delay_ms: 5_000,
        }
    }

    // RFC 4231 test case 1: 20-byte 0x0b key, "Hi There".
    #[test]
    fn hmac_hex_matches_rfc4231_case_1() {
        assert_eq!(
            hmac_hex(&[0x0b; 20], b"Hi There"),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    // RFC 4231 test case 2: key "Jefe".
    #[test]
    fn hmac_hex_matches_rfc4231_case_2() {
        assert_eq!(
            hmac_hex(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn signed_headers_are_deterministic_for_fixed_timestamp() {
        let conn = test_conn();
        let a = signed_headers(&conn, 1_700_000_000_000).unwrap();
        let b = signed_headers(&conn, 1_700_000_000_000).unwrap();
        assert_eq!(a.get(SIGNATURE_HEADER), b.get(SIGNATURE_HEADER));
        assert_eq!(
            a.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer test-key"
        );
        assert_eq!(
            a.get(TIMESTAMP_HEADER).unwrap().to_str().unwrap(),
            "1700000000000"
        );
    }

    #[test]
    fn signature_covers_key_and_timestamp() {
        let conn = test_conn();
        let headers = signed_headers(&conn, 42).unwrap();
        let expected = hmac_hex(b"test-secret", b"test-key42");
        assert_eq!(
            headers.get(SIGNATURE_HEADER).unwrap().to_str().unwrap(),
            expected
        );
        assert_eq!(expected.len(), 64, "SHA-256 output is 32 hex-encoded bytes");
    }

    #[test]
    fn different_timestamps_produce_different_signatures() {
        let conn = test_conn();
        let a = signed_headers(&conn, 1).unwrap();
        let b = signed_headers(&conn, 2).unwrap();
        assert_ne!(a.get(SIGNATURE_HEADER), b.get(SIGNATURE_HEADER));
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let mut conn = test_conn();
        conn.api_key = "bad\nkey".to_string();
        let result = signed_headers(&conn, 1);
        assert!(matches!(
            result,
            Err(ProviderError::InvalidHeader { ref provider_id, .. }) if provider_id == "kazpay"
        ));
    }
}
