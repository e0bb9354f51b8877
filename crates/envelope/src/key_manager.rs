//! Data-key generation and wrapping under the master key.
//!
//! Wrapping is a plain cipher operation over the data key's raw bytes, with
//! its own freshly drawn IV. That wrap IV travels inside the blob and is never
//! the record's data IV.

use zeroize::Zeroizing;

use crate::blob::WrappedKeyBlob;
use crate::cipher::{self, IV_LEN, KEY_LEN};
use crate::error::EnvelopeError;
use crate::keys::{DataIv, DataKey};
use crate::random::{OsRandom, SecureRandom};

/// Generates, wraps, and unwraps per-record data keys.
///
/// Holds nothing but its random source; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct KeyManager<R = OsRandom> {
    rng: R,
}

impl KeyManager<OsRandom> {
    /// A key manager drawing from the OS CSPRNG.
    pub fn new() -> Self {
        Self { rng: OsRandom }
    }
}

impl<R: SecureRandom> KeyManager<R> {
    /// A key manager drawing from `rng`.
    pub fn with_random(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a fresh data key and its payload IV.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::RandomSource`] if the random source fails.
    pub fn generate_data_key(&self) -> Result<(DataKey, DataIv), EnvelopeError> {
        let mut key = DataKey::zeroed();
        self.rng.fill(key.as_mut_bytes())?;
        let mut iv = [0u8; IV_LEN];
        self.rng.fill(&mut iv)?;
        Ok((key, DataIv::from_array(iv)))
    }

    /// Encrypt `data_key` under `master_key`, returning the encoded
    /// `wrap_iv || ciphertext` blob.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyMaterial`] if `master_key` is not
    /// [`KEY_LEN`] bytes, or [`EnvelopeError::RandomSource`] if no wrap IV can
    /// be drawn.
    pub fn wrap_key(
        &self,
        data_key: &DataKey,
        master_key: &[u8],
    ) -> Result<Vec<u8>, EnvelopeError> {
        check_master_key(master_key)?;
        let mut wrap_iv = [0u8; IV_LEN];
        self.rng.fill(&mut wrap_iv)?;
        let ciphertext = cipher::encrypt(data_key.as_bytes(), master_key, &wrap_iv)?;
        Ok(WrappedKeyBlob::new(wrap_iv, ciphertext).encode())
    }

    /// Recover the data key from an encoded blob.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::InvalidKeyMaterial`] if `master_key` is not [`KEY_LEN`] bytes.
    /// - [`EnvelopeError::MalformedBlob`] if `blob` is shorter than the IV prefix.
    /// - [`EnvelopeError::PaddingOrKeyMismatch`] if decryption fails or does
    ///   not yield a [`KEY_LEN`]-byte key.
    pub fn unwrap_key(&self, blob: &[u8], master_key: &[u8]) -> Result<DataKey, EnvelopeError> {
        check_master_key(master_key)?;
        let blob = WrappedKeyBlob::decode(blob)?;
        let raw = Zeroizing::new(cipher::decrypt(
            blob.ciphertext(),
            master_key,
            blob.wrap_iv(),
        )?);
        if raw.len() != KEY_LEN {
            return Err(EnvelopeError::PaddingOrKeyMismatch);
        }
        // Copy straight into the zeroizing key; no intermediate stack array.
        let mut key = DataKey::zeroed();
        key.as_mut_bytes().copy_from_slice(&raw);
        Ok(key)
    }
}

fn check_master_key(master_key: &[u8]) -> Result<(), EnvelopeError> {
    if master_key.len() != KEY_LEN {
        return Err(EnvelopeError::key_length("master key", KEY_LEN, master_key.len()));
    }
    Ok(())
}
