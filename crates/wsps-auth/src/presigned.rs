//! Verification of `@connections` presigned URLs.
//!
//! This is the counterpart of [`crate::presign::presign`]. It rebuilds the
//! canonical request from the incoming request exactly the way the presigner
//! built it: the query string keeps its original parameter order with only
//! `X-Amz-Signature` removed, and the path segments are escaped one by one.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    ALGORITHM, AMZ_DATE_FORMAT, SCOPE_TERMINATOR, SERVICE, SIGNED_HEADERS,
    build_canonical_request, canonical_uri_from_path, credential_scope, scope_date,
};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::sigv4::{
    build_string_to_sign, compute_signature, derive_signing_key, hash_canonical_request,
};

/// The result of a successful presigned URL verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// The access key id that signed the URL.
    pub access_key_id: String,
    /// The region from the credential scope.
    pub region: String,
    /// The stage path segment.
    pub stage: String,
    /// The connection id path segment.
    pub connection_id: String,
}

/// Parsed components from presigned URL query parameters.
#[derive(Debug, Clone)]
pub struct ParsedPresignedParams {
    /// The access key id.
    pub access_key_id: String,
    /// The date component of the credential scope (YYYYMMDD).
    pub date: String,
    /// The region from the credential scope.
    pub region: String,
    /// The amz date timestamp.
    pub timestamp: String,
    /// The URL validity duration in seconds.
    pub expires: u64,
    /// The session token; empty when the parameter is empty or absent.
    pub security_token: String,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Parse presigned URL query parameters into their components.
///
/// # Errors
///
/// Returns [`AuthError::MissingQueryParam`] if any required parameter is absent
/// or malformed, [`AuthError::UnsupportedAlgorithm`] for anything but
/// `AWS4-HMAC-SHA256`, [`AuthError::InvalidCredential`] if the credential
/// format is invalid or its date disagrees with `X-Amz-Date`,
/// [`AuthError::UnsupportedService`] unless the scope names `execute-api`, and
/// [`AuthError::UnsupportedSignedHeaders`] unless only `host` is signed.
pub fn parse_presigned_params(query: &str) -> Result<ParsedPresignedParams, AuthError> {
    let params: HashMap<&str, String> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((key, url_decode(value)))
        })
        .collect();

    let algorithm = required_param(&params, "X-Amz-Algorithm")?;
    if algorithm != ALGORITHM {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let credential = required_param(&params, "X-Amz-Credential")?;
    let timestamp = required_param(&params, "X-Amz-Date")?;
    let expires = required_param(&params, "X-Amz-Expires")?;
    let signed_headers = required_param(&params, "X-Amz-SignedHeaders")?;
    let signature = required_param(&params, "X-Amz-Signature")?;

    // AKID/date/region/service/aws4_request
    let parts: Vec<&str> = credential.splitn(5, '/').collect();
    let [access_key_id, date, region, service, terminator] = parts.as_slice() else {
        return Err(AuthError::InvalidCredential);
    };
    if *terminator != SCOPE_TERMINATOR || *date != scope_date(timestamp) {
        return Err(AuthError::InvalidCredential);
    }
    if *service != SERVICE {
        return Err(AuthError::UnsupportedService((*service).to_owned()));
    }
    if signed_headers != SIGNED_HEADERS {
        return Err(AuthError::UnsupportedSignedHeaders(signed_headers.to_owned()));
    }

    let expires: u64 = expires
        .parse()
        .map_err(|_| AuthError::MissingQueryParam("X-Amz-Expires (invalid integer)".to_owned()))?;

    Ok(ParsedPresignedParams {
        access_key_id: (*access_key_id).to_owned(),
        date: (*date).to_owned(),
        region: (*region).to_owned(),
        timestamp: timestamp.to_owned(),
        expires,
        security_token: params
            .get("X-Amz-Security-Token")
            .cloned()
            .unwrap_or_default(),
        signature: signature.to_owned(),
    })
}

/// Verify a presigned `@connections` request against the current time.
///
/// `body_hash` is the lowercase hex SHA-256 of the request payload.
///
/// # Errors
///
/// See [`verify_presigned_at`].
pub fn verify_presigned(
    parts: &http::request::Parts,
    body_hash: &str,
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthResult, AuthError> {
    verify_presigned_at(parts, body_hash, credential_provider, Utc::now())
}

/// Verify a presigned `@connections` request as of `now`.
///
/// This function:
/// 1. Parses the presigned URL query parameters
/// 2. Checks whether the URL has expired
/// 3. Checks the path is `/<stage>/@connections/<connection_id>`
/// 4. Resolves the credentials and checks the session token
/// 5. Reconstructs the canonical request (excluding `X-Amz-Signature` from the query)
/// 6. Compares signatures using constant-time comparison
///
/// # Errors
///
/// Returns an [`AuthError`] describing the first check that failed.
pub fn verify_presigned_at(
    parts: &http::request::Parts,
    body_hash: &str,
    credential_provider: &dyn CredentialProvider,
    now: DateTime<Utc>,
) -> Result<AuthResult, AuthError> {
    let query = parts.uri.query().unwrap_or("");
    let parsed = parse_presigned_params(query)?;

    debug!(
        access_key_id = %parsed.access_key_id,
        date = %parsed.date,
        region = %parsed.region,
        expires = parsed.expires,
        "Verifying presigned @connections URL"
    );

    check_expiration(&parsed.timestamp, parsed.expires, now)?;

    let path = parts.uri.path();
    let (canonical_uri, stage, connection_id) =
        canonical_uri_from_path(path).ok_or_else(|| AuthError::InvalidPath(path.to_owned()))?;

    let credentials = credential_provider.get_credentials(&parsed.access_key_id)?;
    let token_matches: bool = parsed
        .security_token
        .as_bytes()
        .ct_eq(credentials.session_token.as_bytes())
        .into();
    if !token_matches {
        return Err(AuthError::InvalidSecurityToken);
    }

    let host = extract_host(parts)?;
    let query_string = strip_signature(query);
    let canonical_request = build_canonical_request(
        parts.method.as_str(),
        &canonical_uri,
        &query_string,
        host,
        body_hash,
    );

    let canonical_hash = hash_canonical_request(&canonical_request);
    let scope = credential_scope(&parsed.date, &parsed.region);
    let string_to_sign = build_string_to_sign(&parsed.timestamp, &scope, &canonical_hash);

    debug!(canonical_hash, string_to_sign, "Rebuilt presigned string to sign");

    let signing_key = derive_signing_key(
        &credentials.secret_access_key,
        &parsed.date,
        &parsed.region,
        SERVICE,
    );
    let expected_signature = compute_signature(&signing_key, &string_to_sign);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(
            access_key_id = %parsed.access_key_id,
            %connection_id,
            "Presigned URL verification succeeded"
        );
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
            region: parsed.region,
            stage,
            connection_id,
        })
    } else {
        debug!(
            expected = %expected_signature,
            provided = %parsed.signature,
            "Presigned URL signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Remove `X-Amz-Signature` from the raw query, keeping every other parameter in place.
fn strip_signature(query: &str) -> String {
    query
        .split('&')
        .filter(|param| !param.starts_with("X-Amz-Signature="))
        .collect::<Vec<_>>()
        .join("&")
}

fn check_expiration(timestamp: &str, expires: u64, now: DateTime<Utc>) -> Result<(), AuthError> {
    let signed_at = NaiveDateTime::parse_from_str(timestamp, AMZ_DATE_FORMAT)
        .map_err(|_| AuthError::MissingQueryParam("X-Amz-Date (invalid format)".to_owned()))?
        .and_utc();

    let lifetime = i64::try_from(expires)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or(AuthError::RequestExpired)?;
    let expires_at = signed_at
        .checked_add_signed(lifetime)
        .ok_or(AuthError::RequestExpired)?;

    if now > expires_at {
        return Err(AuthError::RequestExpired);
    }

    Ok(())
}

/// The `host` header, or the URI authority when the header is absent.
fn extract_host(parts: &http::request::Parts) -> Result<&str, AuthError> {
    if let Some(value) = parts.headers.get(http::header::HOST) {
        return value
            .to_str()
            .map_err(|_| AuthError::MissingHeader(SIGNED_HEADERS.to_owned()));
    }

    parts
        .uri
        .authority()
        .map(http::uri::Authority::as_str)
        .ok_or_else(|| AuthError::MissingHeader(SIGNED_HEADERS.to_owned()))
}

fn url_decode(input: &str) -> String {
    percent_encoding::percent_decode_str(input)
        .decode_utf8_lossy()
        .into_owned()
}

fn required_param<'a>(params: &'a HashMap<&str, String>, name: &str) -> Result<&'a str, AuthError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| AuthError::MissingQueryParam(name.to_owned()))
}
