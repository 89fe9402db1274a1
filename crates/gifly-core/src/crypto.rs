//! Cryptographic utilities for webhook verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum webhook payload size (10MB).
pub const MAX_WEBHOOK_SIZE: usize = 10 * 1024 * 1024;

/// Computes HMAC-SHA256 of data with the given key and returns as hex string.
pub fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

/// Verifies a GitHub webhook signature using constant-time comparison.
///
/// GitHub sends signatures in the format `sha256=<hex>`, computed over the
/// raw request body. Returns false (never an error) when the secret or the
/// signature header is missing or empty.
pub fn verify_github_signature(secret: &str, signature: &str, body: &[u8]) -> bool {
    if secret.is_empty() || signature.is_empty() {
        return false;
    }

    // GitHub signature format: sha256=<hex>
    let expected_prefix = "sha256=";
    if !signature.starts_with(expected_prefix) {
        return false;
    }

    let provided_signature = &signature[expected_prefix.len()..];
    let computed = hmac_sha256_hex(secret.as_bytes(), body);

    // Constant-time comparison
    constant_time_eq(provided_signature.as_bytes(), computed.as_bytes())
}

/// Constant-time equality comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
