//! The persisted triple produced by one protect call, in raw and
//! base64-encoded form.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// Output of a single protect call: everything needed to reveal the payload
/// given the master key.
///
/// All three fields must come from the same write. Mixing fields across
/// records is not detected and decrypts to garbage or a padding error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    /// Payload encrypted under the data key and data IV.
    pub ciphertext: Vec<u8>,
    /// Encoded wrapped-key blob (`wrap_iv || wrapped data key`).
    pub wrapped_key: Vec<u8>,
    /// IV used for the payload.
    pub data_iv: Vec<u8>,
}

/// Storage/transport form of [`EncryptedRecord`]: each field as standard,
/// padded base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRecord {
    pub ciphertext: String,
    pub wrapped_key: String,
    pub data_iv: String,
}

impl From<&EncryptedRecord> for EncodedRecord {
    fn from(record: &EncryptedRecord) -> Self {
        Self {
            ciphertext: STANDARD.encode(&record.ciphertext),
            wrapped_key: STANDARD.encode(&record.wrapped_key),
            data_iv: STANDARD.encode(&record.data_iv),
        }
    }
}

impl TryFrom<&EncodedRecord> for EncryptedRecord {
    type Error = EnvelopeError;

    fn try_from(encoded: &EncodedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            ciphertext: decode_field(&encoded.ciphertext, "ciphertext")?,
            wrapped_key: decode_field(&encoded.wrapped_key, "wrapped_key")?,
            data_iv: decode_field(&encoded.data_iv, "data_iv")?,
        })
    }
}

fn decode_field(value: &str, field: &'static str) -> Result<Vec<u8>, EnvelopeError> {
    STANDARD
        .decode(value)
        .map_err(|_| EnvelopeError::InvalidEncoding { field })
}
