//! Async HTTP client for mosparo.
//!
//! Wraps the protocol logic of `mosparo-core` with the HTTP round trips to a
//! mosparo server: submission verification, statistics by date and the health
//! check. Requests are signed with the project's private key and verdicts are
//! only returned after their signature and field coverage have been checked.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mosparo_client::MosparoClient;
//! use mosparo_core::{Credentials, FormData, MosparoConfig};
//!
//! # async fn run(form: FormData) -> Result<(), mosparo_client::ClientError> {
//! let config = MosparoConfig::new(
//!     "https://mosparo.example.com",
//!     Credentials::new("publicKey", "privateKey"),
//! );
//! let client = MosparoClient::new(&config)?;
//!
//! let result = client
//!     .verify_submission_with_required_fields(&form, &["name", "email"])
//!     .await?;
//! assert!(result.is_valid());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::MosparoClient;
pub use error::{ClientError, ClientResult};
