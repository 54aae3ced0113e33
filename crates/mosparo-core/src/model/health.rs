//! Health check result.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Response of the health check endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    /// Service name, `mosparo` for a genuine server.
    #[serde(default)]
    pub service: Option<String>,
    /// Whether the server considers itself healthy.
    #[serde(default, deserialize_with = "null_as_default")]
    pub healthy: bool,
    /// Database connection state, e.g. `connected`.
    #[serde(default)]
    pub database_status: Option<String>,
    /// Error description reported by the server.
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthCheckResult {
    /// Whether the server considers itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_deserialize_healthy_result() {
        let json = r#"{
            "service": "mosparo",
            "healthy": true,
            "databaseStatus": "connected",
            "error": null
        }"#;
        let result: HealthCheckResult = serde_json::from_str(json).unwrap();

        assert!(result.is_healthy());
        assert_eq!(result.service.as_deref(), Some("mosparo"));
        assert_eq!(result.database_status.as_deref(), Some("connected"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_should_deserialize_unhealthy_result() {
        let json = r#"{"service": "mosparo", "healthy": false, "error": "database unreachable"}"#;
        let result: HealthCheckResult = serde_json::from_str(json).unwrap();
        assert!(!result.is_healthy());
        assert_eq!(result.error.as_deref(), Some("database unreachable"));
    }
}
