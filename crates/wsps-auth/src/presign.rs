//! Presigned URL generation for `@connections` endpoints.
//!
//! [`presign`] turns a [`SigningRequest`] into a URL whose query parameters
//! carry a SigV4 signature scoped to the `execute-api` service:
//!
//! - `X-Amz-Algorithm` - Always `AWS4-HMAC-SHA256`
//! - `X-Amz-Credential` - `AKID/date/region/execute-api/aws4_request`, escaped as one value
//! - `X-Amz-Date` - ISO 8601 basic format timestamp (`YYYYMMDDTHHMMSSZ`)
//! - `X-Amz-Expires` - Validity duration in seconds
//! - `X-Amz-Security-Token` - Session token, emitted even when empty
//! - `X-Amz-SignedHeaders` - Always `host`
//! - `X-Amz-Signature` - The hex-encoded signature, appended last
//!
//! The function is pure. It performs no validation: callers pass path-safe
//! `stage`/`connection_id` values, and malformed input yields a well-formed
//! URL that will not verify.

use chrono::{DateTime, Utc};
use tracing::debug;
use wsps_core::PresignConfig;

use crate::canonical::{
    CONNECTIONS_SEGMENT, SERVICE, build_canonical_request, build_canonical_uri,
    build_query_string, credential_scope, format_amz_date, scope_date,
};
use crate::credentials::Credentials;
use crate::sigv4::{
    build_string_to_sign, compute_signature, derive_signing_key, hash_canonical_request,
    sha256_digest,
};

/// Everything needed to presign one `@connections` URL.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method; only used as the first line of the canonical request.
    pub method: String,
    /// AWS region, copied verbatim into the credential scope.
    pub region: String,
    /// Gateway host name.
    pub host: String,
    /// API deployment stage.
    pub stage: String,
    /// Target connection id.
    pub connection_id: String,
    /// Raw SHA-256 digest of the request payload.
    pub body_sha256: [u8; 32],
    /// Signing time.
    pub date: DateTime<Utc>,
    /// Lifetime of the URL in seconds.
    pub expires_in_seconds: u64,
    /// Credentials to sign with.
    pub credentials: Credentials,
}

/// A presigned URL together with the intermediate signing artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedResult {
    /// The signed URL, ready to use as a request target.
    pub url: String,
    /// The exact canonical request that was hashed.
    pub canonical_request: String,
    /// The exact string that was HMAC-signed.
    pub string_to_sign: String,
}

/// Presign an `@connections` URL.
///
/// The canonical request uses escaped path segments while the returned URL
/// inserts `stage` and `connection_id` raw. Both use the same query string.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wsps_auth::credentials::Credentials;
/// use wsps_auth::presign::{SigningRequest, presign};
/// use wsps_auth::sigv4::sha256_digest;
///
/// let result = presign(&SigningRequest {
///     method: "GET".to_owned(),
///     region: "us-east-1".to_owned(),
///     host: "abc123.execute-api.us-east-1.amazonaws.com".to_owned(),
///     stage: "prod".to_owned(),
///     connection_id: "AAA=".to_owned(),
///     body_sha256: sha256_digest(b""),
///     date: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
///     expires_in_seconds: 300,
///     credentials: Credentials::new("AKIDEXAMPLE", "secret"),
/// });
/// assert!(result.url.starts_with("https://abc123.execute-api.us-east-1.amazonaws.com/prod/@connections/AAA=?"));
/// ```
#[must_use]
pub fn presign(request: &SigningRequest) -> PresignedResult {
    let credentials = &request.credentials;
    let amz_date = format_amz_date(&request.date);
    let scope_date = scope_date(&amz_date);
    let scope = credential_scope(scope_date, &request.region);

    debug!(
        access_key_id = %credentials.access_key_id,
        region = %request.region,
        stage = %request.stage,
        connection_id = %request.connection_id,
        expires = request.expires_in_seconds,
        "Presigning @connections URL"
    );

    let query_string = build_query_string(
        &credentials.access_key_id,
        &scope,
        &amz_date,
        request.expires_in_seconds,
        &credentials.session_token,
    );

    let canonical_uri = build_canonical_uri(&request.stage, &request.connection_id);
    let canonical_request = build_canonical_request(
        &request.method,
        &canonical_uri,
        &query_string,
        &request.host,
        &hex::encode(request.body_sha256),
    );

    let canonical_hash = hash_canonical_request(&canonical_request);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_hash);

    debug!(canonical_hash, string_to_sign, "Built presign string to sign");

    let signing_key = derive_signing_key(
        &credentials.secret_access_key,
        scope_date,
        &request.region,
        SERVICE,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let url = format!(
        "https://{}/{}/{CONNECTIONS_SEGMENT}/{}?{query_string}&X-Amz-Signature={signature}",
        request.host, request.stage, request.connection_id
    );

    PresignedResult {
        url,
        canonical_request,
        string_to_sign,
    }
}

/// Presigns connection URLs for one configured gateway endpoint.
///
/// Holds no mutable state; the caller supplies the signing time on every
/// call. Rotated credentials are swapped in with [`Presigner::with_credentials`].
#[derive(Debug, Clone)]
pub struct Presigner {
    config: PresignConfig,
    credentials: Credentials,
}

impl Presigner {
    /// Create a presigner for `config` signing with `credentials`.
    #[must_use]
    pub fn new(config: PresignConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// The endpoint configuration.
    #[must_use]
    pub fn config(&self) -> &PresignConfig {
        &self.config
    }

    /// Replace the signing credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Build the signing request for `connection_id` at `date` with an empty payload.
    #[must_use]
    pub fn signing_request(&self, connection_id: &str, date: DateTime<Utc>) -> SigningRequest {
        SigningRequest {
            method: self.config.method.clone(),
            region: self.config.region.as_str().to_owned(),
            host: self.config.host.clone(),
            stage: self.config.stage.clone(),
            connection_id: connection_id.to_owned(),
            body_sha256: sha256_digest(b""),
            date,
            expires_in_seconds: self.config.expires_in_seconds,
            credentials: self.credentials.clone(),
        }
    }

    /// Presign the URL for `connection_id` at `date`.
    #[must_use]
    pub fn presign_connection(&self, connection_id: &str, date: DateTime<Utc>) -> PresignedResult {
        presign(&self.signing_request(connection_id, date))
    }
}
