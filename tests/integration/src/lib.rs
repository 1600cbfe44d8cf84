//! Integration tests for WSPS.
//!
//! These tests drive the whole flow across crates: configuration loading,
//! presigning through [`wsps_auth::Presigner`], and verification of the
//! resulting URL as an HTTP request.
//!
//! Run them with:
//! ```text
//! cargo test -p wsps-integration
//! ```

use std::collections::HashMap;
use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use wsps_auth::{Credentials, Presigner, StaticCredentialProvider};
use wsps_core::PresignConfig;

static INIT: Once = Once::new();

/// Access key used throughout the tests.
pub const ACCESS_KEY: &str = "AKIDEXAMPLE";

/// Secret key used throughout the tests.
pub const SECRET_KEY: &str = "secret";

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A fixed signing time.
#[must_use]
pub fn signing_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

/// Load a [`PresignConfig`] from the given variables instead of the process environment.
#[must_use]
pub fn config_from(vars: &[(&str, &str)]) -> PresignConfig {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    PresignConfig::from_lookup(|key| map.get(key).cloned()).unwrap()
}

/// A presigner for `api_id` in `us-east-1` with the test credentials.
#[must_use]
pub fn presigner(api_id: &str) -> Presigner {
    init_tracing();
    let config = config_from(&[("WSPS_API_ID", api_id), ("WSPS_REGION", "us-east-1")]);
    Presigner::new(config, Credentials::new(ACCESS_KEY, SECRET_KEY))
}

/// A provider that knows the test credentials.
#[must_use]
pub fn provider() -> StaticCredentialProvider {
    StaticCredentialProvider::new(vec![Credentials::new(ACCESS_KEY, SECRET_KEY)])
}

/// Turn a presigned URL into request parts, as a gateway would receive it.
#[must_use]
pub fn request_parts(method: &str, url: &str) -> http::request::Parts {
    let (parts, _body) = http::Request::builder()
        .method(method)
        .uri(url)
        .body(())
        .unwrap()
        .into_parts();
    parts
}

mod test_presign;
mod test_verify;
