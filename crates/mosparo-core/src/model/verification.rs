//! Verification request and result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::canonical::HashedFormData;

/// Signed verification request for one form submission.
///
/// `verification_signature` is kept for authenticating the answer and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Submit token taken from the form.
    pub submit_token: String,
    /// HMAC of the validation token.
    pub validation_signature: String,
    /// HMAC of the canonical hashed form data.
    pub form_signature: String,
    /// Hashed form data without the protocol tokens.
    pub form_data: HashedFormData,
    /// HMAC of `validation_signature + form_signature`.
    #[serde(skip)]
    pub verification_signature: String,
}

/// Verification state the server reports for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldStatus {
    /// The field passed the server's rules.
    Valid,
    /// The field failed the server's rules.
    Invalid,
    /// The field is known to the server but was not checked.
    NotVerified,
    /// A status this client does not know about.
    Unknown(String),
}

impl FieldStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::NotVerified => "not-verified",
            Self::Unknown(s) => s,
        }
    }
}

impl From<String> for FieldStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "valid" => Self::Valid,
            "invalid" => Self::Invalid,
            "not-verified" => Self::NotVerified,
            _ => Self::Unknown(value),
        }
    }
}

impl From<FieldStatus> for String {
    fn from(value: FieldStatus) -> Self {
        match value {
            FieldStatus::Unknown(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem the server found with a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Human readable description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Result of a submission verification as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether the submission is valid.
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: bool,
    /// Server-side verification signature; only present when valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_signature: Option<String>,
    /// Per-field verification state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified_fields: BTreeMap<String, FieldStatus>,
    /// Issues found with individual fields.
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
    /// Whether the server rejected the request.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: bool,
    /// Message accompanying `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VerificationResult {
    /// Whether the submission is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the server reported any issue.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Whether the server flagged the request as erroneous.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Status of a single field, if the server evaluated it.
    #[must_use]
    pub fn field_status(&self, name: &str) -> Option<&FieldStatus> {
        self.verified_fields.get(name)
    }
}
