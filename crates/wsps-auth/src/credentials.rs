//! AWS credentials and credential lookup.
//!
//! [`Credentials`] is the triple the presigner signs with. The verifier
//! resolves the same triple by access key id through a
//! [`CredentialProvider`]. Sourcing and rotating credentials is left to the
//! caller; [`StaticCredentialProvider`] only holds what it was given.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// An AWS access key id, secret access key, and (possibly empty) session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key id.
    pub access_key_id: String,
    /// The secret access key.
    pub secret_access_key: String,
    /// The session token; empty for long-term credentials.
    pub session_token: String,
}

impl Credentials {
    /// Create long-term credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: String::new(),
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = session_token.into();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &if self.session_token.is_empty() {
                    ""
                } else {
                    "** redacted **"
                },
            )
            .finish()
    }
}

/// Trait for looking up credentials by access key id.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the credentials for the given access key id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key id is not recognized.
    fn get_credentials(&self, access_key_id: &str) -> Result<Credentials, AuthError>;
}

/// An in-memory credential provider keyed by access key id.
///
/// # Examples
///
/// ```
/// use wsps_auth::credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     Credentials::new("AKIDEXAMPLE", "secret").with_session_token("token"),
/// ]);
///
/// let creds = provider.get_credentials("AKIDEXAMPLE").unwrap();
/// assert_eq!(creds.secret_access_key, "secret");
/// assert_eq!(creds.session_token, "token");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, Credentials>,
}

impl StaticCredentialProvider {
    /// Create a provider from an iterable of credentials.
    ///
    /// A later entry replaces an earlier one with the same access key id.
    pub fn new(credentials: impl IntoIterator<Item = Credentials>) -> Self {
        Self {
            credentials: credentials
                .into_iter()
                .map(|c| (c.access_key_id.clone(), c))
                .collect(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_credentials(&self, access_key_id: &str) -> Result<Credentials, AuthError> {
        self.credentials
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key_id.to_owned()))
    }
}
