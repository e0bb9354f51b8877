//! Key material: the long-lived [`MasterKey`] and the per-record
//! [`DataKey`] / [`DataIv`] pair.
//!
//! Secret types zero their memory on drop and never print their bytes in
//! `Debug` output.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::cipher::{IV_LEN, KEY_LEN};
use crate::error::EnvelopeError;

type HmacSha256 = Hmac<Sha256>;

const FINGERPRINT_LABEL: &[u8] = b"envelope/master-key-fingerprint/v1";
const FINGERPRINT_LEN: usize = 8;

/// The 256-bit key that wraps every data key.
///
/// Loaded once at startup and shared read-only. Only ever used as a cipher key
/// for wrapping; never used to encrypt payloads directly.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LEN]);

impl MasterKey {
    /// Build a master key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyMaterial`] unless `bytes` is exactly
    /// [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() != KEY_LEN {
            return Err(EnvelopeError::key_length("master key", KEY_LEN, bytes.len()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Decode a master key from its standard-base64 configuration form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidEncoding`] if `encoded` is not base64,
    /// or [`EnvelopeError::InvalidKeyMaterial`] if it does not decode to
    /// exactly [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, EnvelopeError> {
        let decoded = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|_| EnvelopeError::InvalidEncoding { field: "master_key" })?,
        );
        Self::from_bytes(&decoded)
    }

    /// Raw key bytes, for passing into the envelope operations.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// A short, non-secret identifier for this key.
    ///
    /// Computed as the first 8 bytes of HMAC-SHA256 over a fixed label, keyed
    /// by the master key, in unpadded base64url. Safe to log.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyMaterial`] if the MAC rejects the key.
    pub fn fingerprint(&self) -> Result<String, EnvelopeError> {
        let mut mac = HmacSha256::new_from_slice(&self.0)
            .map_err(|_| EnvelopeError::key_length("master key", KEY_LEN, self.0.len()))?;
        mac.update(FINGERPRINT_LABEL);
        let tag = mac.finalize().into_bytes();
        Ok(URL_SAFE_NO_PAD.encode(&tag[..FINGERPRINT_LEN]))
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// A per-record 256-bit data key.
///
/// Lives only for the duration of a single protect or reveal call.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DataKey([u8; KEY_LEN]);

impl DataKey {
    /// An all-zero key, filled in place by the caller.
    pub(crate) fn zeroed() -> Self {
        Self([0u8; KEY_LEN])
    }

    #[cfg(test)]
    pub(crate) fn from_array(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DataKey([REDACTED])")
    }
}

/// The IV used to encrypt a record's payload. Not secret; stored with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataIv([u8; IV_LEN]);

impl DataIv {
    pub(crate) fn from_array(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw IV bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_key_requires_exact_length() {
        assert!(MasterKey::from_bytes(&[0u8; KEY_LEN]).is_ok());
        for len in [0usize, 16, 31, 33, 64] {
            let err = MasterKey::from_bytes(&vec![0u8; len]).unwrap_err();
            assert!(
                matches!(err, EnvelopeError::InvalidKeyMaterial { actual, .. } if actual == len)
            );
        }
    }

    #[test]
    fn master_key_from_base64() {
        let encoded = STANDARD.encode([7u8; KEY_LEN]);
        let key = MasterKey::from_base64(&format!("  {encoded}\n")).unwrap();
        assert_eq!(key.as_bytes(), &[7u8; KEY_LEN]);
    }

    #[test]
    fn master_key_base64_wrong_length() {
        let encoded = STANDARD.encode([7u8; 16]);
        assert!(matches!(
            MasterKey::from_base64(&encoded),
            Err(EnvelopeError::InvalidKeyMaterial { actual: 16, .. })
        ));
    }

    #[test]
    fn master_key_base64_garbage() {
        assert_eq!(
            MasterKey::from_base64("not base64!!").unwrap_err(),
            EnvelopeError::InvalidEncoding { field: "master_key" }
        );
    }

    #[test]
    fn fingerprint_is_stable_and_key_specific() {
        let a = MasterKey::from_bytes(&[1u8; KEY_LEN]).unwrap();
        let a2 = MasterKey::from_bytes(&[1u8; KEY_LEN]).unwrap();
        let b = MasterKey::from_bytes(&[2u8; KEY_LEN]).unwrap();
        let fa = a.fingerprint().unwrap();
        assert_eq!(fa, a2.fingerprint().unwrap());
        assert_ne!(fa, b.fingerprint().unwrap());
        // 8 bytes in unpadded base64url.
        assert_eq!(fa.len(), 11);
    }

    #[test]
    fn secrets_redacted_in_debug() {
        let master = MasterKey::from_bytes(&[0xFF; KEY_LEN]).unwrap();
        let data = DataKey::from_array([0xEE; KEY_LEN]);
        assert_eq!(format!("{master:?}"), "MasterKey([REDACTED])");
        assert_eq!(format!("{data:?}"), "DataKey([REDACTED])");
    }

    #[test]
    fn zeroize_clears_data_key() {
        let mut key = DataKey::from_array([0xAA; KEY_LEN]);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }
}
