//! Core types and configuration for WSPS.
//!
//! This crate holds the pieces shared by the presigner and its verifier:
//! the region type, the environment-driven presign configuration, and the
//! error type for configuration loading.

mod config;
mod error;
mod types;

pub use config::PresignConfig;
pub use error::{WspsError, WspsResult};
pub use types::AwsRegion;
