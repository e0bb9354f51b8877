//! AES-256-CBC encryption and decryption of arbitrary byte payloads.
//!
//! **Algorithm:** AES with a 256-bit key and 128-bit block, chained with CBC
//! and padded with PKCS#7. The caller supplies both key and IV; this module
//! never generates key material.
//!
//! **No integrity.** CBC + PKCS#7 offers confidentiality only. A padding failure
//! is the sole corruption signal, and crafted ciphertext can pass it.

use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::EnvelopeError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (one AES block, 16 bytes).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encrypt `plaintext` under `key` and `iv`.
///
/// The output is always a non-empty multiple of [`BLOCK_LEN`]; a plaintext
/// that already fills whole blocks gains one full block of padding.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKeyMaterial`] if `key` is not [`KEY_LEN`]
/// bytes or `iv` is not [`IV_LEN`] bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    check_lengths(key, iv)?;
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|_| EnvelopeError::key_length("cipher key", KEY_LEN, key.len()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt `ciphertext` under `key` and `iv` and strip the padding.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKeyMaterial`] on a bad key or IV length.
/// Returns [`EnvelopeError::PaddingOrKeyMismatch`] if the ciphertext is not a
/// whole number of blocks or the recovered padding is invalid.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    check_lengths(key, iv)?;
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| EnvelopeError::key_length("cipher key", KEY_LEN, key.len()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::PaddingOrKeyMismatch)
}

fn check_lengths(key: &[u8], iv: &[u8]) -> Result<(), EnvelopeError> {
    if key.len() != KEY_LEN {
        return Err(EnvelopeError::key_length("cipher key", KEY_LEN, key.len()));
    }
    if iv.len() != IV_LEN {
        return Err(EnvelopeError::key_length("cipher IV", IV_LEN, iv.len()));
    }
    Ok(())
}
