//! SigV4 signing primitives.
//!
//! The pieces shared by the presigner and the verifier:
//!
//! 1. Build the string to sign from the timestamp, credential scope, and canonical request hash.
//! 2. Derive the signing key using the HMAC-SHA256 chain over the credential scope components.
//! 3. Compute the hex-encoded signature of the string to sign.

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

use crate::canonical::{ALGORITHM, SCOPE_TERMINATOR};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded SHA-256 of the empty payload.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <amz date>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use wsps_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20230101T000000Z",
///     "20230101/us-east-1/execute-api/aws4_request",
///     "25985d63b03729774a0b7b3d720134658451631b9743b44155c913148a49591f",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20230101T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    amz_date: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
///
/// # Examples
///
/// ```
/// use wsps_auth::sigv4::derive_signing_key;
///
/// let key = derive_signing_key(
///     "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
///     "20120215",
///     "us-east-1",
///     "iam",
/// );
/// assert_eq!(
///     hex::encode(key),
///     "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
/// );
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    [date, region, service, SCOPE_TERMINATOR]
        .iter()
        .fold(format!("AWS4{secret_key}").into_bytes(), |key, part| {
            hmac_sha256(&key, part.as_bytes())
        })
}

/// Compute the lowercase hex HMAC-SHA256 signature of `data` with `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Lowercase hex SHA-256 of a canonical request (or any string).
#[must_use]
pub fn hash_canonical_request(canonical_request: &str) -> String {
    hex::encode(Sha256::digest(canonical_request.as_bytes()))
}

/// Compute the raw SHA-256 digest of a payload.
///
/// # Examples
///
/// ```
/// use wsps_auth::sigv4::{EMPTY_PAYLOAD_SHA256, sha256_digest};
///
/// assert_eq!(hex::encode(sha256_digest(b"")), EMPTY_PAYLOAD_SHA256);
/// ```
#[must_use]
pub fn sha256_digest(payload: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(payload));
    out
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// # Examples
///
/// ```
/// use wsps_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
