//! Wrapped-key blob codec.
//!
//! # Layout
//!
//! ```text
//! +----------------+-------------------------------------------+
//! | wrap IV (16 B) | AES-256-CBC(master key, wrap IV, data key) |
//! +----------------+-------------------------------------------+
//! ```
//!
//! The IV prefix has a fixed length, so decoding is a single split. A blob of
//! exactly [`IV_LEN`] bytes decodes to an empty ciphertext, which the cipher
//! later rejects.

use crate::cipher::IV_LEN;
use crate::error::EnvelopeError;

/// A data key encrypted under the master key, with the IV used to encrypt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKeyBlob {
    wrap_iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl WrappedKeyBlob {
    /// Assemble a blob from its parts.
    pub fn new(wrap_iv: [u8; IV_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            wrap_iv,
            ciphertext,
        }
    }

    /// The IV the data key was wrapped with.
    pub fn wrap_iv(&self) -> &[u8; IV_LEN] {
        &self.wrap_iv
    }

    /// The wrapped data key ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialise as `wrap_iv || ciphertext`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.wrap_iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split an encoded blob back into IV and ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MalformedBlob`] if `bytes` is shorter than
    /// [`IV_LEN`].
    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() < IV_LEN {
            return Err(EnvelopeError::MalformedBlob { len: bytes.len() });
        }
        let (iv, ciphertext) = bytes.split_at(IV_LEN);
        let mut wrap_iv = [0u8; IV_LEN];
        wrap_iv.copy_from_slice(iv);
        Ok(Self {
            wrap_iv,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_places_iv_first() {
        let blob = WrappedKeyBlob::new([0x11; IV_LEN], vec![0x22, 0x33, 0x44]);
        let bytes = blob.encode();
        assert_eq!(bytes.len(), IV_LEN + 3);
        assert_eq!(&bytes[..IV_LEN], &[0x11; IV_LEN]);
        assert_eq!(&bytes[IV_LEN..], &[0x22, 0x33, 0x44]);
    }

    #[test]
    fn decode_splits_at_iv_boundary() {
        let mut bytes: Vec<u8> = (0u8..IV_LEN as u8).collect();
        bytes.extend_from_slice(&[0xAA; 48]);
        let blob = WrappedKeyBlob::decode(&bytes).unwrap();
        assert_eq!(blob.wrap_iv()[0], 0);
        assert_eq!(blob.wrap_iv()[IV_LEN - 1], IV_LEN as u8 - 1);
        assert_eq!(blob.ciphertext(), &[0xAA; 48][..]);
        assert_eq!(blob.encode(), bytes);
    }

    #[test]
    fn exactly_iv_length_yields_empty_ciphertext() {
        let blob = WrappedKeyBlob::decode(&[9u8; IV_LEN]).unwrap();
        assert!(blob.ciphertext().is_empty());
    }

    #[test]
    fn shorter_than_iv_rejected() {
        assert_eq!(
            WrappedKeyBlob::decode(&[0u8; IV_LEN - 1]).unwrap_err(),
            EnvelopeError::MalformedBlob { len: IV_LEN - 1 }
        );
        assert_eq!(
            WrappedKeyBlob::decode(&[]).unwrap_err(),
            EnvelopeError::MalformedBlob { len: 0 }
        );
    }
}
