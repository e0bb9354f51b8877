//! Injectable secure-random capability.
//!
//! Production code uses [`OsRandom`]. Tests substitute a deterministic source
//! through the same trait.

use rand::{rngs::OsRng, RngCore};

use crate::error::EnvelopeError;

/// A source of cryptographically secure random bytes.
///
/// Implementations must be safe to share across threads.
#[cfg_attr(test, mockall::automock)]
pub trait SecureRandom: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EnvelopeError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EnvelopeError::RandomSource(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill(&mut a).unwrap();
        OsRandom.fill(&mut b).unwrap();
        assert_ne!(a, [0u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn mock_failure_surfaces() {
        let mut rng = MockSecureRandom::new();
        rng.expect_fill()
            .returning(|_| Err(EnvelopeError::RandomSource("entropy exhausted".into())));
        let mut buf = [0u8; 4];
        assert!(matches!(
            rng.fill(&mut buf),
            Err(EnvelopeError::RandomSource(_))
        ));
    }
}
