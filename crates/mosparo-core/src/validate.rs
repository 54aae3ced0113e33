//! Trust checks on a verification result.
//!
//! Checks run in order and the first failure wins:
//!
//! 1. `error` flag set by the server: fail with its message.
//! 2. `valid` result: the returned verification signature must equal the
//!    locally computed one. Invalid results carry no signature.
//! 3. Every required field must appear in `verifiedFields`, whatever its
//!    status. A field the server never saw was not protected, e.g. one added
//!    in the browser after the page was instrumented.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::{MosparoError, MosparoResult};
use crate::model::{VerificationRequest, VerificationResult};

/// Validate `result` against the `request` it answers.
///
/// An empty `required_fields` skips the field coverage check.
pub fn validate_verification(
    request: &VerificationRequest,
    result: VerificationResult,
    required_fields: &[&str],
) -> MosparoResult<VerificationResult> {
    if result.has_error() {
        let message = result.error_message.unwrap_or_default();
        warn!(message = %message, "mosparo rejected the verification request");
        return Err(MosparoError::Rejected(message));
    }

    check_signature(request, &result)?;
    check_required_fields(&result, required_fields)?;

    debug!(
        valid = result.valid,
        verified_fields = result.verified_fields.len(),
        "Verification result accepted"
    );
    Ok(result)
}

fn check_signature(request: &VerificationRequest, result: &VerificationResult) -> MosparoResult<()> {
    if !result.is_valid() {
        return Ok(());
    }

    let matches = result.verification_signature.as_deref().is_some_and(|actual| {
        actual
            .as_bytes()
            .ct_eq(request.verification_signature.as_bytes())
            .into()
    });

    if matches {
        Ok(())
    } else {
        warn!(
            expected = %request.verification_signature,
            actual = ?result.verification_signature,
            "verification signature mismatch"
        );
        Err(MosparoError::SignatureMismatch {
            expected: request.verification_signature.clone(),
            actual: result.verification_signature.clone(),
        })
    }
}

fn check_required_fields(result: &VerificationResult, required_fields: &[&str]) -> MosparoResult<()> {
    match required_fields
        .iter()
        .find(|field| !result.verified_fields.contains_key(**field))
    {
        Some(missing) => {
            warn!(field = %missing, "required field was not verified");
            Err(MosparoError::RequiredFieldNotVerified((*missing).to_owned()))
        }
        None => Ok(()),
    }
}
