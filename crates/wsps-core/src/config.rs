//! Presign configuration.
//!
//! All configuration is driven by environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WSPS_METHOD` | `GET` | HTTP method placed in the canonical request |
//! | `WSPS_REGION` | `AWS_REGION`, then `DEFAULT_REGION`, then `us-east-1` | Signing region |
//! | `WSPS_HOST` | *(required unless `WSPS_API_ID` is set)* | Gateway host name |
//! | `WSPS_API_ID` | *(unset)* | API id used to derive the `execute-api` host |
//! | `WSPS_STAGE` | `prod` | Deployment stage |
//! | `WSPS_EXPIRES` | `300` | Lifetime of presigned URLs in seconds |

use std::env;

use tracing::debug;

use crate::error::{WspsError, WspsResult};
use crate::types::AwsRegion;

/// Everything the presigner needs besides credentials, a connection id and a clock reading.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignConfig {
    /// HTTP method used in the canonical request.
    pub method: String,
    /// Signing region.
    pub region: AwsRegion,
    /// Gateway host name, used as the `host` header and URL authority.
    pub host: String,
    /// API deployment stage.
    pub stage: String,
    /// Lifetime of presigned URLs in seconds.
    pub expires_in_seconds: u64,
}

impl PresignConfig {
    /// Default HTTP method.
    pub const DEFAULT_METHOD: &str = "GET";
    /// Default deployment stage.
    pub const DEFAULT_STAGE: &str = "prod";
    /// Default URL lifetime in seconds.
    pub const DEFAULT_EXPIRES_IN_SECONDS: u64 = 300;

    /// Create a configuration for `host` with default method, stage and expiry.
    #[must_use]
    pub fn new(region: AwsRegion, host: impl Into<String>) -> Self {
        Self {
            method: Self::DEFAULT_METHOD.to_owned(),
            region,
            host: host.into(),
            stage: Self::DEFAULT_STAGE.to_owned(),
            expires_in_seconds: Self::DEFAULT_EXPIRES_IN_SECONDS,
        }
    }

    /// Create a configuration for the `execute-api` endpoint of `api_id` in `region`.
    #[must_use]
    pub fn for_api(region: AwsRegion, api_id: &str) -> Self {
        let host = region.execute_api_host(api_id);
        Self::new(region, host)
    }

    /// Set the deployment stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Set the URL lifetime in seconds.
    #[must_use]
    pub fn with_expires_in_seconds(mut self, expires_in_seconds: u64) -> Self {
        self.expires_in_seconds = expires_in_seconds;
        self
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> WspsResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> WspsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let region = get("WSPS_REGION")
            .or_else(|| get("AWS_REGION"))
            .or_else(|| get("DEFAULT_REGION"))
            .map(AwsRegion::new)
            .unwrap_or_default();

        let mut config = match (get("WSPS_HOST"), get("WSPS_API_ID")) {
            (Some(host), _) => Self::new(region, host),
            (None, Some(api_id)) => Self::for_api(region, &api_id),
            (None, None) => return Err(WspsError::MissingVariable("WSPS_HOST".to_owned())),
        };

        if let Some(v) = get("WSPS_METHOD") {
            config.method = v;
        }
        if let Some(v) = get("WSPS_STAGE") {
            config.stage = v;
        }
        if let Some(v) = get("WSPS_EXPIRES") {
            config.expires_in_seconds = v
                .parse()
                .map_err(|_| WspsError::Config(format!("invalid WSPS_EXPIRES: {v}")))?;
        }

        debug!(
            method = %config.method,
            region = %config.region,
            host = %config.host,
            stage = %config.stage,
            expires_in_seconds = config.expires_in_seconds,
            "loaded presign configuration"
        );

        Ok(config)
    }
}
