//! Canonical request construction for `@connections` presigned URLs.
//!
//! The canonical request has the usual SigV4 shape:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! QueryString\n
//! host:<host>\n\n
//! host\n
//! HashedPayload
//! ```
//!
//! The query string carries the presign parameters in a fixed order and is
//! used verbatim both here and in the final URL. It is never re-sorted.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// The signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// The service name in the credential scope.
pub const SERVICE: &str = "execute-api";

/// The credential scope terminator.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

/// The management path segment between stage and connection id.
pub const CONNECTIONS_SEGMENT: &str = "@connections";

/// The only signed header.
pub const SIGNED_HEADERS: &str = "host";

/// Format string for the amz date (`YYYYMMDDTHHMMSSZ`).
pub const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Characters escaped in query values and canonical path segments.
///
/// Everything except the RFC 3986 unreserved set (`A-Z a-z 0-9 - _ . ~`) is
/// escaped, including `/`, and a space becomes `%20`.
const ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-escape a single query value or path segment.
///
/// # Examples
///
/// ```
/// use wsps_auth::canonical::escape;
///
/// assert_eq!(escape("AKID/20230101"), "AKID%2F20230101");
/// assert_eq!(escape("a b"), "a%20b");
/// assert_eq!(escape("@connections"), "%40connections");
/// ```
#[must_use]
pub fn escape(input: &str) -> String {
    utf8_percent_encode(input, ESCAPE_SET).to_string()
}

/// Format a signing instant as an amz date (`YYYYMMDDTHHMMSSZ`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wsps_auth::canonical::format_amz_date;
///
/// let date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(format_amz_date(&date), "20230101T000000Z");
/// ```
#[must_use]
pub fn format_amz_date(date: &DateTime<Utc>) -> String {
    date.format(AMZ_DATE_FORMAT).to_string()
}

/// The 8-character scope date prefix of an amz date.
#[must_use]
pub fn scope_date(amz_date: &str) -> &str {
    amz_date.get(..8).unwrap_or(amz_date)
}

/// Build the credential scope: `<scope_date>/<region>/execute-api/aws4_request`.
#[must_use]
pub fn credential_scope(scope_date: &str, region: &str) -> String {
    format!("{scope_date}/{region}/{SERVICE}/{SCOPE_TERMINATOR}")
}

/// Build the presign query string in its fixed parameter order.
///
/// The credential (`<access_key_id>/<credential_scope>`) and the session
/// token are each escaped as one unit. An empty token is still emitted.
///
/// # Examples
///
/// ```
/// use wsps_auth::canonical::build_query_string;
///
/// let qs = build_query_string(
///     "AKID",
///     "20230101/us-east-1/execute-api/aws4_request",
///     "20230101T000000Z",
///     300,
///     "",
/// );
/// assert!(qs.starts_with("X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Credential=AKID%2F20230101"));
/// assert!(qs.ends_with("&X-Amz-Security-Token=&X-Amz-SignedHeaders=host"));
/// ```
#[must_use]
pub fn build_query_string(
    access_key_id: &str,
    credential_scope: &str,
    amz_date: &str,
    expires_in_seconds: u64,
    session_token: &str,
) -> String {
    let credential = escape(&format!("{access_key_id}/{credential_scope}"));
    let token = escape(session_token);
    let signed_headers = escape(SIGNED_HEADERS);

    [
        format!("X-Amz-Algorithm={ALGORITHM}"),
        format!("X-Amz-Credential={credential}"),
        format!("X-Amz-Date={amz_date}"),
        format!("X-Amz-Expires={expires_in_seconds}"),
        format!("X-Amz-Security-Token={token}"),
        format!("X-Amz-SignedHeaders={signed_headers}"),
    ]
    .join("&")
}

/// Build the canonical URI `/<stage>/%40connections/<connection_id>`, escaping each segment.
///
/// # Examples
///
/// ```
/// use wsps_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("prod", "AAA="), "/prod/%40connections/AAA%3D");
/// ```
#[must_use]
pub fn build_canonical_uri(stage: &str, connection_id: &str) -> String {
    format!(
        "/{}/{}/{}",
        escape(stage),
        escape(CONNECTIONS_SEGMENT),
        escape(connection_id)
    )
}

/// Build the canonical URI from a raw request path, decoding each segment before escaping it.
///
/// Returns `None` unless the path has the shape `/<stage>/@connections/<connection_id>`.
/// Decoding first means a path that arrives percent-encoded and one that
/// arrives raw produce the same canonical form.
#[must_use]
pub fn canonical_uri_from_path(path: &str) -> Option<(String, String, String)> {
    let mut segments = path.strip_prefix('/')?.split('/');
    let stage = decode(segments.next()?);
    let connections = decode(segments.next()?);
    let connection_id = decode(segments.next()?);

    if segments.next().is_some()
        || connections != CONNECTIONS_SEGMENT
        || stage.is_empty()
        || connection_id.is_empty()
    {
        return None;
    }

    let canonical_uri = build_canonical_uri(&stage, &connection_id);
    Some((canonical_uri, stage, connection_id))
}

/// Build the full canonical request.
///
/// The header block is the single line `host:<host>` followed by its own
/// newline, which leaves a blank line before the signed headers list.
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    query_string: &str,
    host: &str,
    payload_hash: &str,
) -> String {
    format!(
        "{method}\n{canonical_uri}\n{query_string}\nhost:{host}\n\n{SIGNED_HEADERS}\n{payload_hash}"
    )
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
