//! Error type shared by every layer of the envelope core.

use thiserror::Error;

/// Errors produced by the cipher, key-management, and orchestration layers.
///
/// Messages never include key material; only lengths and field names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// A key or IV does not have the required fixed length.
    #[error("invalid key material: {what} must be {expected} bytes, got {actual}")]
    InvalidKeyMaterial {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A wrapped-key blob is too short to contain its IV prefix.
    #[error("malformed wrapped-key blob: {len} bytes is shorter than the IV prefix")]
    MalformedBlob { len: usize },

    /// Decryption produced invalid padding, or the unwrapped key has the wrong
    /// shape. Either the key/IV pairing is wrong or the ciphertext is corrupt.
    #[error("decryption failed: bad padding or key mismatch")]
    PaddingOrKeyMismatch,

    /// No master key is configured.
    #[error("master key is not configured")]
    MasterKeyUnavailable,

    /// The OS random source failed to produce bytes.
    #[error("secure random source failed: {0}")]
    RandomSource(String),

    /// A stored field is not valid base64.
    #[error("invalid base64 in field `{field}`")]
    InvalidEncoding { field: &'static str },
}

impl EnvelopeError {
    pub(crate) fn key_length(what: &'static str, expected: usize, actual: usize) -> Self {
        EnvelopeError::InvalidKeyMaterial {
            what,
            expected,
            actual,
        }
    }
}
