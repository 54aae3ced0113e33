//! HMAC-SHA256 signature chain and request authentication.
//!
//! All signatures are `hex(HMAC-SHA256(private_key, data))`:
//!
//! ```text
//! formSignature         = HMAC(canonical_json(hashed form data))
//! validationSignature   = HMAC(validation token)
//! verificationSignature = HMAC(validationSignature + formSignature)
//! Authorization         = Base64(publicKey + ":" + HMAC(endpoint + body))
//! ```
//!
//! The verification signature never leaves the process. It is compared with
//! the one returned by the server to authenticate a positive verdict.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{HashedFormData, canonical_json, normalize_form_data};
use crate::config::Credentials;
use crate::error::{MosparoError, MosparoResult};
use crate::model::VerificationRequest;
use crate::value::{FormData, FormValue};
use crate::{SUBMIT_TOKEN_KEY, VALIDATION_TOKEN_KEY};

type HmacSha256 = Hmac<Sha256>;

/// Body signed for requests that carry none (GET endpoints).
pub const EMPTY_BODY: &str = "{}";

/// Signs verification requests and API calls with a project's key pair.
///
/// The MAC is keyed once at construction. Each signature starts from a clone
/// of the keyed state, so a single signer can be shared across threads.
#[derive(Clone)]
pub struct RequestSigner {
    public_key: String,
    mac: HmacSha256,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("public_key", &self.public_key)
            .field("mac", &"...")
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer from a public key and a private key.
    pub fn new(public_key: impl Into<String>, private_key: &str) -> MosparoResult<Self> {
        Self::with_key_bytes(public_key.into(), private_key.as_bytes())
    }

    /// Create a signer from project credentials.
    pub fn from_credentials(credentials: &Credentials) -> MosparoResult<Self> {
        Self::with_key_bytes(
            credentials.public_key.clone(),
            credentials.private_key.expose(),
        )
    }

    fn with_key_bytes(public_key: String, key: &[u8]) -> MosparoResult<Self> {
        let mac = HmacSha256::new_from_slice(key).map_err(|_| MosparoError::InvalidKey)?;
        Ok(Self { public_key, mac })
    }

    /// Public key this signer authenticates as.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Hex-encoded HMAC-SHA256 of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosparo_core::RequestSigner;
    ///
    /// let signer = RequestSigner::new("publicKey", "privateKey").unwrap();
    /// assert_eq!(
    ///     signer.hmac_hex("testData"),
    ///     "0646b5f2e09db205a8b3eb0e7429645561a1b9fdff1fcdb1fed9cd585108d850"
    /// );
    /// ```
    #[must_use]
    pub fn hmac_hex(&self, data: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Signature over the canonical JSON of hashed form data.
    pub fn form_signature(&self, hashed: &HashedFormData) -> MosparoResult<String> {
        Ok(self.hmac_hex(&canonical_json(hashed)?))
    }

    /// Build the signed verification request for a form submission.
    ///
    /// Fails if either protocol token is missing or not a string.
    pub fn build_verification_request(&self, raw: &FormData) -> MosparoResult<VerificationRequest> {
        let submit_token = extract_submit_token(raw)?;
        let validation_token = extract_validation_token(raw)?;

        let form_data = normalize_form_data(raw);
        let form_signature = self.form_signature(&form_data)?;
        let validation_signature = self.hmac_hex(validation_token);
        let verification_signature =
            self.hmac_hex(&format!("{validation_signature}{form_signature}"));

        debug!(
            fields = form_data.len(),
            form_signature = %form_signature,
            validation_signature = %validation_signature,
            "Built verification request"
        );

        Ok(VerificationRequest {
            submit_token: submit_token.to_owned(),
            validation_signature,
            form_signature,
            form_data,
            verification_signature,
        })
    }

    /// `Authorization` header value for a call to `endpoint` carrying `body`.
    ///
    /// `endpoint` is the API path without host or query string.
    #[must_use]
    pub fn auth_header(&self, endpoint: &str, body: &str) -> String {
        let request_signature = self.hmac_hex(&format!("{endpoint}{body}"));
        BASE64.encode(format!("{}:{request_signature}", self.public_key))
    }

    /// `Authorization` header value for a call without a body.
    #[must_use]
    pub fn auth_header_without_body(&self, endpoint: &str) -> String {
        self.auth_header(endpoint, EMPTY_BODY)
    }
}

/// Submit token carried by the form.
pub fn extract_submit_token(raw: &FormData) -> MosparoResult<&str> {
    extract_token(raw, SUBMIT_TOKEN_KEY)
}

/// Validation token carried by the form.
pub fn extract_validation_token(raw: &FormData) -> MosparoResult<&str> {
    extract_token(raw, VALIDATION_TOKEN_KEY)
}

fn extract_token<'a>(raw: &'a FormData, key: &'static str) -> MosparoResult<&'a str> {
    match raw.get(key) {
        Some(FormValue::Text(token)) => Ok(token),
        Some(_) => Err(MosparoError::InvalidToken { key }),
        None => Err(MosparoError::MissingToken { key }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALIDATION_SIGNATURE: &str =
        "a20d6b36f87420850ef281ee977a554df2a749ed1892944e8ed22a1bc9c882a1";
    const FORM_SIGNATURE: &str = "cca193d4d38890d7aa0c27bc590da0a2a98ffc304dc19e947b5da8d4498f015c";
    const VERIFICATION_SIGNATURE: &str =
        "ec196315e575f7f5b250f4e95d88cd45442b17ef4ff36141ed090d2814e3d8a3";

    fn test_signer() -> RequestSigner {
        RequestSigner::new("publicKey", "privateKey").unwrap()
    }

    fn john_example() -> FormData {
        let mut form = FormData::new();
        form.insert("lastname".to_owned(), FormValue::from("Example"));
        form.insert("firstname".to_owned(), FormValue::from("John"));
        form.insert(SUBMIT_TOKEN_KEY.to_owned(), FormValue::from("submitToken"));
        form.insert(
            VALIDATION_TOKEN_KEY.to_owned(),
            FormValue::from("validationToken"),
        );
        form
    }

    #[test]
    fn test_should_compute_hmac_hex() {
        assert_eq!(
            test_signer().hmac_hex("testData"),
            "0646b5f2e09db205a8b3eb0e7429645561a1b9fdff1fcdb1fed9cd585108d850"
        );
    }

    #[test]
    fn test_should_be_reusable_across_calls() {
        let signer = test_signer();
        assert_eq!(signer.hmac_hex("a"), signer.hmac_hex("a"));
        assert_ne!(signer.hmac_hex("a"), signer.hmac_hex("b"));
    }

    #[test]
    fn test_should_sign_empty_form_as_empty_object() {
        let signer = test_signer();
        assert_eq!(
            signer.form_signature(&HashedFormData::new()).unwrap(),
            signer.hmac_hex("{}")
        );
    }

    #[test]
    fn test_should_sign_nested_form_golden_vector() {
        let form: FormData = serde_json::from_value(serde_json::json!({
            "name": "Test Tester",
            "address": {"street": "Teststreet\r\nTest\r\nStreet", "number": 123},
            "valid": false,
            "email": ["test@example.com", "test2@example.com"],
            "website": null,
            "data": {},
        }))
        .unwrap();

        let hashed = normalize_form_data(&form);
        assert_eq!(
            test_signer().form_signature(&hashed).unwrap(),
            "1c13aaab5163600326ab369ad900db3a9faa5d813282f64505d23bc09ca08086"
        );
    }

    #[test]
    fn test_should_build_verification_request_golden_vector() {
        let request = test_signer()
            .build_verification_request(&john_example())
            .unwrap();

        assert_eq!(request.submit_token, "submitToken");
        assert_eq!(request.validation_signature, VALIDATION_SIGNATURE);
        assert_eq!(request.form_signature, FORM_SIGNATURE);
        assert_eq!(request.verification_signature, VERIFICATION_SIGNATURE);
        assert_eq!(
            request.form_data["firstname"].as_digest(),
            Some("a8cfcd74832004951b4408cdb0a5dbcd8c7e52d43f7fe244bf720582e05241da")
        );
        assert_eq!(
            request.form_data["lastname"].as_digest(),
            Some("d029f87e3d80f8fd9b1be67c7426b4cc1ff47b4a9d0a8461c826a59d8c5eb6cd")
        );
    }

    #[test]
    fn test_should_chain_verification_signature() {
        let signer = test_signer();
        let request = signer.build_verification_request(&john_example()).unwrap();
        assert_eq!(
            request.verification_signature,
            signer.hmac_hex(&format!(
                "{}{}",
                request.validation_signature, request.form_signature
            ))
        );
    }

    #[test]
    fn test_should_reject_missing_submit_token() {
        let mut form = john_example();
        form.remove(SUBMIT_TOKEN_KEY);
        let err = test_signer().build_verification_request(&form).unwrap_err();
        assert_eq!(err.to_string(), "_mosparo_submitToken must be provided.");
    }

    #[test]
    fn test_should_reject_missing_validation_token() {
        let mut form = john_example();
        form.remove(VALIDATION_TOKEN_KEY);
        let err = test_signer().build_verification_request(&form).unwrap_err();
        assert_eq!(err.to_string(), "_mosparo_validationToken must be provided.");
    }

    #[test]
    fn test_should_reject_non_string_token() {
        let mut form = john_example();
        form.insert(VALIDATION_TOKEN_KEY.to_owned(), FormValue::from(42_i64));
        let err = test_signer().build_verification_request(&form).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_mosparo_validationToken must be a String value."
        );
    }

    #[test]
    fn test_should_build_auth_header() {
        let signer = test_signer();
        assert_eq!(
            signer.auth_header_without_body("/api/v1/statistic/by-date"),
            "cHVibGljS2V5OmZjZjA0MGNkNzc4YzQyY2Y4ODMzMTk2YWMxMGFmNzg0YjhmYzYyMmYyN2VmMTg0MmUyYTI0MjU0OGFjZjI4ZTc="
        );
        assert_eq!(
            signer.auth_header("/api/v1/statistic/by-date", EMPTY_BODY),
            signer.auth_header_without_body("/api/v1/statistic/by-date")
        );
    }

    #[test]
    fn test_should_not_leak_private_key_in_debug() {
        let debug = format!("{:?}", test_signer());
        assert!(debug.contains("publicKey"));
        assert!(!debug.contains("privateKey"));
    }
}
