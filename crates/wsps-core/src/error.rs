//! Error types for the WSPS core.

/// Core error type for WSPS configuration.
#[derive(Debug, thiserror::Error)]
pub enum WspsError {
    /// A required environment variable is not set.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for WSPS operations.
pub type WspsResult<T> = Result<T, WspsError>;
