//! The single source of IVs, nonces and generated keys.
//!
//! Both engines take a [`SecureRandom`] so that every byte of IV or key
//! material comes from the same CSPRNG. There is no non-cryptographic fallback.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::CryptoError;

/// Cryptographically secure byte generator.
#[cfg_attr(test, mockall::automock)]
pub trait SecureRandom: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating-system CSPRNG (`getrandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Random(e.to_string()))
    }
}

/// Draw a fresh `N`-byte array.
pub(crate) fn random_array<const N: usize, R: SecureRandom + ?Sized>(
    rng: &R,
) -> Result<[u8; N], CryptoError> {
    let mut out = [0u8; N];
    rng.fill(&mut out)?;
    Ok(out)
}
