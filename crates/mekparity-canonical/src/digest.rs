//! Record digests with domain-separated hashing.
//!
//! A record digest is `sha256(domain_separator || canonical_json(record))`,
//! encoded as base64url without padding. Two records with identical content
//! always produce the same digest.

use crate::record::CanonicalUnitRecord;
use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

/// Domain separator for record digests: `b"mekparity:record:v1\0"`.
const RECORD_DOMAIN_SEPARATOR: &[u8] = b"mekparity:record:v1\0";

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256.
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + bytes digest, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm.
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    pub b64: String,
}

impl Digest {
    /// Constructs a validated digest.
    pub fn new(alg: DigestAlg, b64: impl Into<String>) -> Result<Self, ValidationError> {
        let b64 = b64.into();
        let re = Regex::new(r"^[A-Za-z0-9_-]{43,44}$").expect("invalid regex");
        if !re.is_match(&b64) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b64,
            });
        }
        Ok(Digest { alg, b64 })
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha-256:{}", self.b64)
    }
}

/// Error during digest computation.
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    /// The record could not be turned into JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonical JSON encoding failed (e.g. non-finite tonnage).
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
    /// Digest construction failed.
    #[error("invalid digest: {0}")]
    Invalid(#[from] ValidationError),
}

/// Computes the digest of a canonical record.
///
/// # Errors
///
/// Returns [`DigestError`] if the record cannot be serialized or
/// canonicalized.
pub fn record_digest(record: &CanonicalUnitRecord) -> Result<Digest, DigestError> {
    let value =
        serde_json::to_value(record).map_err(|e| DigestError::Serialization(e.to_string()))?;
    let canonical = canonical_json::to_string(&value)
        .map_err(|e| DigestError::Canonicalization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(RECORD_DOMAIN_SEPARATOR);
    hasher.update(canonical.as_bytes());
    let hash_bytes = hasher.finalize();

    use base64::Engine;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash_bytes);
    Ok(Digest::new(DigestAlg::Sha256, b64)?)
}
