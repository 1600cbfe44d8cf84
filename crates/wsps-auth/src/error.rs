//! Error types for presigned URL verification.
//!
//! Presigning itself cannot fail. Every verification failure is represented
//! by [`AuthError`].

/// Errors that can occur while verifying an `@connections` presigned URL.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The signing algorithm is not supported (only AWS4-HMAC-SHA256 is supported).
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The `X-Amz-Credential` value does not match
    /// `AKID/date/region/service/aws4_request`, or its date disagrees with `X-Amz-Date`.
    #[error("Invalid credential format")]
    InvalidCredential,

    /// The credential scope names a service other than `execute-api`.
    #[error("Unsupported service: {0}")]
    UnsupportedService(String),

    /// `X-Amz-SignedHeaders` lists anything other than `host`.
    #[error("Unsupported signed headers: {0}")]
    UnsupportedSignedHeaders(String),

    /// A required query parameter is missing or malformed.
    #[error("Missing required query parameter: {0}")]
    MissingQueryParam(String),

    /// A required HTTP header is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The request path is not `/<stage>/@connections/<connection_id>`.
    #[error("Invalid @connections path: {0}")]
    InvalidPath(String),

    /// The access key id was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The `X-Amz-Security-Token` does not match the stored session token.
    #[error("The security token included in the request is invalid")]
    InvalidSecurityToken,

    /// The URL has expired (current time exceeds `X-Amz-Date` + `X-Amz-Expires`).
    #[error("Request has expired")]
    RequestExpired,

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
