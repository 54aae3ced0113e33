//! Configuration for mosparo clients.
//!
//! All configuration is driven by environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{MosparoError, MosparoResult};

/// Default HTTP timeout for calls to the mosparo server.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Private key of a mosparo project.
///
/// Never printed: `Debug` and `Display` render a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Wrap a private key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key bytes for MAC initialisation.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Public and private key pair of a mosparo project.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Public key, sent with every request.
    pub public_key: String,
    /// Private key, used only for HMAC computation.
    pub private_key: PrivateKey,
}

impl Credentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: PrivateKey::new(private_key),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct MosparoConfig {
    /// Base URL of the mosparo server, e.g. `https://mosparo.example.com`.
    pub url: String,
    /// Project credentials.
    pub credentials: Credentials,
    /// Request timeout.
    pub timeout: Duration,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl MosparoConfig {
    /// Create a configuration with default timeout and log level.
    #[must_use]
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: "info".to_owned(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `MOSPARO_URL` | *(required)* | Base URL of the server |
    /// | `MOSPARO_PUBLIC_KEY` | *(required)* | Project public key |
    /// | `MOSPARO_PRIVATE_KEY` | *(required)* | Project private key |
    /// | `MOSPARO_TIMEOUT_SECS` | `30` | Request timeout, at least 1 |
    /// | `LOG_LEVEL` | `info` | Log level filter |
    pub fn from_env() -> MosparoResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MosparoResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| MosparoError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("MOSPARO_URL")?,
            Credentials::new(
                required("MOSPARO_PUBLIC_KEY")?,
                required("MOSPARO_PRIVATE_KEY")?,
            ),
        );

        if let Some(v) = lookup("MOSPARO_TIMEOUT_SECS") {
            let secs = v.parse::<u64>().map_err(|_| {
                MosparoError::Config(format!("MOSPARO_TIMEOUT_SECS is not a number: {v}"))
            })?;
            if secs == 0 {
                return Err(MosparoError::Config(
                    "MOSPARO_TIMEOUT_SECS must be greater than 0".to_owned(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }
}
