//! Per-record envelope encryption.
//!
//! Each record's payload is encrypted with its own random 256-bit data key
//! (AES-256-CBC, PKCS#7). The data key is then wrapped under a long-lived
//! master key with an independent IV. Only the payload ciphertext, the wrapped
//! key blob, and the payload IV are persisted.
//!
//! ```
//! let master = [0u8; 32];
//! let record = envelope::protect(b"Test sensitive data", &master).unwrap();
//! let plaintext = envelope::reveal(&record, &master).unwrap();
//! assert_eq!(plaintext, b"Test sensitive data");
//! ```
//!
//! # Security invariants
//!
//! - The master key is passed into every call; nothing here stores it.
//! - Data keys are zeroized on drop and never leave a single call.
//! - The payload IV and the wrap IV are drawn separately and never shared.
//! - There is no integrity check. Corrupted input may decrypt to garbage.

pub mod blob;
pub mod cipher;
pub mod error;
pub mod key_manager;
pub mod keys;
pub mod orchestration;
pub mod random;
pub mod record;

pub use blob::WrappedKeyBlob;
pub use cipher::{IV_LEN, KEY_LEN};
pub use error::EnvelopeError;
pub use key_manager::KeyManager;
pub use keys::{DataIv, DataKey, MasterKey};
pub use orchestration::{protect, require_master_key, reveal, Envelope};
pub use random::{OsRandom, SecureRandom};
pub use record::{EncodedRecord, EncryptedRecord};
