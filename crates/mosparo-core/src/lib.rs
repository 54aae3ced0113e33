//! Client-side half of the mosparo form verification protocol.
//!
//! This crate turns submitted form data into the signed envelope a mosparo
//! server expects, and checks the server's verdict before it is trusted. It
//! performs no I/O: the HTTP round trip lives in `mosparo-client`.
//!
//! # Overview
//!
//! A form protected by mosparo carries two opaque tokens next to the user's
//! fields. The backend hashes every field value, signs the hashed tree and the
//! validation token with the project's private key, and chains both signatures
//! into a verification signature that is kept locally. A positive verdict is
//! only trusted when the server echoes that same verification signature and
//! reports every security-relevant field as evaluated.
//!
//! # Usage
//!
//! ```rust
//! use mosparo_core::{FormData, FormValue, RequestSigner};
//!
//! let signer = RequestSigner::new("publicKey", "privateKey").unwrap();
//!
//! let mut form = FormData::new();
//! form.insert("firstname".to_owned(), FormValue::from("John"));
//! form.insert("_mosparo_submitToken".to_owned(), FormValue::from("submitToken"));
//! form.insert("_mosparo_validationToken".to_owned(), FormValue::from("validationToken"));
//!
//! let request = signer.build_verification_request(&form).unwrap();
//! assert_eq!(request.submit_token, "submitToken");
//! assert!(!request.form_data.contains_key("_mosparo_submitToken"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Hashing and key ordering of form data
//! - [`config`] - Environment-driven configuration and credentials
//! - [`error`] - Error type and error categories
//! - [`model`] - Wire types for verification, statistics and health check
//! - [`signer`] - HMAC signature chain and `Authorization` header derivation
//! - [`validate`] - Trust checks on verification results
//! - [`value`] - The form value sum type

pub mod canonical;
pub mod config;
pub mod error;
pub mod model;
pub mod signer;
pub mod validate;
pub mod value;

pub use canonical::{HashedFormData, HashedValue, normalize, normalize_form_data};
pub use config::{Credentials, MosparoConfig, PrivateKey};
pub use error::{ErrorKind, MosparoError, MosparoResult};
pub use model::{
    FieldStatus, HealthCheckResult, Issue, Statistic, StatisticData, StatisticResult,
    VerificationRequest, VerificationResult,
};
pub use signer::{EMPTY_BODY, RequestSigner};
pub use validate::validate_verification;
pub use value::{FormData, FormValue};

/// Form key carrying the submit token issued by the mosparo frontend.
pub const SUBMIT_TOKEN_KEY: &str = "_mosparo_submitToken";

/// Form key carrying the validation token issued by the mosparo frontend.
pub const VALIDATION_TOKEN_KEY: &str = "_mosparo_validationToken";

/// API path of the verification endpoint.
pub const VERIFICATION_API_ENDPOINT: &str = "/api/v1/verification/verify";

/// API path of the statistics-by-date endpoint.
pub const STATISTIC_BY_DATE_API_ENDPOINT: &str = "/api/v1/statistic/by-date";

/// API path of the health check endpoint.
pub const HEALTH_CHECK_API_ENDPOINT: &str = "/api/v1/health/check";
