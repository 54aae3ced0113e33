//! Canonical hashing of form data.
//!
//! Every terminal value is replaced by the SHA-256 hex digest of its text
//! form, lists keep their order and maps are re-keyed in sorted order at every
//! level:
//!
//! ```text
//! null        -> sha256("")
//! "a\r\nb"    -> sha256("a\nb")
//! 123 / true  -> sha256("123") / sha256("true")
//! [x, y]      -> [normalize(x), normalize(y)]
//! {b: y, a: x} -> {a: normalize(x), b: normalize(y)}
//! ```
//!
//! The mosparo server hashes the same tree independently, so the rules must
//! match it byte for byte.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::MosparoResult;
use crate::value::{FormData, FormValue};
use crate::{SUBMIT_TOKEN_KEY, VALIDATION_TOKEN_KEY};

/// Hashed form data with the protocol tokens removed, keys sorted.
pub type HashedFormData = BTreeMap<String, HashedValue>;

/// A form value after canonical hashing.
///
/// Serializes transparently: digests as JSON strings, lists as arrays and maps
/// as objects with sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum HashedValue {
    /// SHA-256 hex digest of a terminal value.
    Digest(String),
    /// Hashed list, order preserved.
    List(Vec<HashedValue>),
    /// Hashed map, keys sorted.
    Map(BTreeMap<String, HashedValue>),
}

impl HashedValue {
    /// Returns the digest if this is a terminal value.
    #[must_use]
    pub fn as_digest(&self) -> Option<&str> {
        match self {
            Self::Digest(d) => Some(d),
            _ => None,
        }
    }
}

/// SHA-256 hex digest of a text value after CRLF normalization.
///
/// # Examples
///
/// ```
/// use mosparo_core::canonical::hash_text;
///
/// assert_eq!(hash_text("a\r\nb"), hash_text("a\nb"));
/// assert_eq!(
///     hash_text(""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Canonically hash a single form value.
#[must_use]
pub fn normalize(value: &FormValue) -> HashedValue {
    match value {
        FormValue::Null => HashedValue::Digest(hash_text("")),
        FormValue::Text(s) => HashedValue::Digest(hash_text(s)),
        FormValue::List(items) => HashedValue::List(items.iter().map(normalize).collect()),
        FormValue::Map(entries) => HashedValue::Map(normalize_entries(entries.iter())),
        // Remaining scalars are hashed through their canonical text form.
        scalar @ (FormValue::Number(_) | FormValue::Bool(_)) => {
            HashedValue::Digest(hash_text(&scalar.to_string()))
        }
    }
}

/// Hash a whole form, dropping the submit and validation tokens.
///
/// # Examples
///
/// ```
/// use mosparo_core::{FormData, FormValue, normalize_form_data};
///
/// let mut form = FormData::new();
/// form.insert("street".to_owned(), FormValue::from("Teststreet"));
/// form.insert("_mosparo_submitToken".to_owned(), FormValue::from("token"));
///
/// let hashed = normalize_form_data(&form);
/// assert_eq!(hashed.len(), 1);
/// assert!(hashed.contains_key("street"));
/// ```
#[must_use]
pub fn normalize_form_data(raw: &FormData) -> HashedFormData {
    normalize_entries(
        raw.iter()
            .filter(|(key, _)| !is_protocol_key(key)),
    )
}

/// Compact JSON encoding of the hashed tree, the input of the form signature.
pub fn canonical_json(hashed: &HashedFormData) -> MosparoResult<String> {
    Ok(serde_json::to_string(hashed)?)
}

fn normalize_entries<'a>(
    entries: impl Iterator<Item = (&'a String, &'a FormValue)>,
) -> BTreeMap<String, HashedValue> {
    entries
        .map(|(key, value)| (key.clone(), normalize(value)))
        .collect()
}

fn is_protocol_key(key: &str) -> bool {
    key == SUBMIT_TOKEN_KEY || key == VALIDATION_TOKEN_KEY
}
