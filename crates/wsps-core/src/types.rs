//! Common AWS type definitions.

use std::fmt;

/// AWS Region identifier.
///
/// The value is opaque: it is copied verbatim into the credential scope and
/// into derived endpoint host names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region used when nothing else is configured.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host name of the `execute-api` endpoint for the given API id in this region.
    ///
    /// # Examples
    ///
    /// ```
    /// use wsps_core::AwsRegion;
    ///
    /// let region = AwsRegion::new("eu-west-1");
    /// assert_eq!(
    ///     region.execute_api_host("abc123"),
    ///     "abc123.execute-api.eu-west-1.amazonaws.com"
    /// );
    /// ```
    #[must_use]
    pub fn execute_api_host(&self, api_id: &str) -> String {
        format!("{api_id}.execute-api.{}.amazonaws.com", self.0)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AwsRegion {
    fn from(region: &str) -> Self {
        Self::new(region)
    }
}
