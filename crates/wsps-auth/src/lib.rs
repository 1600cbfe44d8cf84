//! SigV4 presigned URLs for API Gateway WebSocket `@connections` endpoints.
//!
//! This crate computes a time-limited URL that authorizes a client to address
//! a WebSocket connection through the API Gateway management API, and
//! verifies such URLs on the receiving side.
//!
//! # Overview
//!
//! Presigning is a pure computation: timestamp formatting, query string
//! assembly, canonical request, string to sign, the HMAC-SHA256 key
//! derivation chain, and finally the URL. The query parameters keep a fixed
//! order that the verifier reproduces verbatim. Sending the request, and
//! sourcing or refreshing credentials, is left to the caller.
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use wsps_auth::{Credentials, Presigner, StaticCredentialProvider, verify_presigned_at};
//! use wsps_auth::sigv4::EMPTY_PAYLOAD_SHA256;
//! use wsps_core::{AwsRegion, PresignConfig};
//!
//! let config = PresignConfig::for_api(AwsRegion::new("us-east-1"), "abc123");
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret");
//! let presigner = Presigner::new(config, credentials.clone());
//!
//! let date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let presigned = presigner.presign_connection("AAA=", date);
//!
//! let (parts, _body) = http::Request::get(&presigned.url).body(()).unwrap().into_parts();
//! let provider = StaticCredentialProvider::new(vec![credentials]);
//! let result = verify_presigned_at(&parts, EMPTY_PAYLOAD_SHA256, &provider, date).unwrap();
//! assert_eq!(result.connection_id, "AAA=");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Escaping, query string, and canonical request construction
//! - [`credentials`] - Credential triple and lookup trait
//! - [`error`] - Verification error types
//! - [`presign`] - Presigned URL generation
//! - [`presigned`] - Presigned URL verification
//! - [`sigv4`] - String to sign, key derivation, and signature primitives

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod presign;
pub mod presigned;
pub mod sigv4;

pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use presign::{PresignedResult, Presigner, SigningRequest, presign};
pub use presigned::{AuthResult, verify_presigned, verify_presigned_at};
pub use sigv4::{hash_payload, sha256_digest};
