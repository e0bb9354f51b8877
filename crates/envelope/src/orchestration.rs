//! Protect and reveal: the write and read paths over the key manager and
//! cipher.
//!
//! Write: draw a data key and IV, encrypt the payload, wrap the data key under
//! the master key, drop the data key. Read: unwrap, then decrypt. Neither path
//! keeps keys between calls.

use tracing::debug;

use crate::cipher::{self, KEY_LEN};
use crate::error::EnvelopeError;
use crate::key_manager::KeyManager;
use crate::keys::MasterKey;
use crate::random::{OsRandom, SecureRandom};
use crate::record::EncryptedRecord;

/// Envelope encryption over an injectable random source.
#[derive(Debug, Clone, Default)]
pub struct Envelope<R = OsRandom> {
    keys: KeyManager<R>,
}

impl Envelope<OsRandom> {
    /// An envelope drawing keys and IVs from the OS CSPRNG.
    pub fn new() -> Self {
        Self {
            keys: KeyManager::new(),
        }
    }
}

impl<R: SecureRandom> Envelope<R> {
    /// An envelope drawing keys and IVs from `rng`.
    pub fn with_random(rng: R) -> Self {
        Self {
            keys: KeyManager::with_random(rng),
        }
    }

    /// The underlying key manager.
    pub fn key_manager(&self) -> &KeyManager<R> {
        &self.keys
    }

    /// Encrypt `plaintext` under a fresh data key and wrap that key under
    /// `master_key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyMaterial`] before any key is drawn if
    /// `master_key` is not 32 bytes. Random-source and cipher errors propagate
    /// unchanged.
    pub fn protect(
        &self,
        plaintext: &[u8],
        master_key: &[u8],
    ) -> Result<EncryptedRecord, EnvelopeError> {
        if master_key.len() != KEY_LEN {
            return Err(EnvelopeError::key_length("master key", KEY_LEN, master_key.len()));
        }

        let (data_key, data_iv) = self.keys.generate_data_key()?;
        let ciphertext = cipher::encrypt(plaintext, data_key.as_bytes(), data_iv.as_bytes())?;
        let wrapped_key = self.keys.wrap_key(&data_key, master_key)?;
        drop(data_key);

        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "record protected"
        );
        Ok(EncryptedRecord {
            ciphertext,
            wrapped_key,
            data_iv: data_iv.as_bytes().to_vec(),
        })
    }

    /// Unwrap the record's data key and decrypt its payload.
    ///
    /// `record` is only read; revealing the same record twice yields the same
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Key-manager and cipher errors propagate unchanged: `InvalidKeyMaterial`,
    /// `MalformedBlob`, or `PaddingOrKeyMismatch`.
    pub fn reveal(
        &self,
        record: &EncryptedRecord,
        master_key: &[u8],
    ) -> Result<Vec<u8>, EnvelopeError> {
        let data_key = self.keys.unwrap_key(&record.wrapped_key, master_key)?;
        let plaintext = cipher::decrypt(&record.ciphertext, data_key.as_bytes(), &record.data_iv)?;
        debug!(ciphertext_len = record.ciphertext.len(), "record revealed");
        Ok(plaintext)
    }
}

/// [`Envelope::protect`] with the OS CSPRNG.
pub fn protect(plaintext: &[u8], master_key: &[u8]) -> Result<EncryptedRecord, EnvelopeError> {
    Envelope::new().protect(plaintext, master_key)
}

/// [`Envelope::reveal`] with the OS CSPRNG.
pub fn reveal(record: &EncryptedRecord, master_key: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    Envelope::new().reveal(record, master_key)
}

/// Resolve an optionally configured master key, failing fast when absent.
///
/// # Errors
///
/// Returns [`EnvelopeError::MasterKeyUnavailable`] if `key` is `None`.
pub fn require_master_key(key: Option<&MasterKey>) -> Result<&MasterKey, EnvelopeError> {
    key.ok_or(EnvelopeError::MasterKeyUnavailable)
}
