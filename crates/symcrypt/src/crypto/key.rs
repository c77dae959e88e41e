//! [`KeyMaterial`]: raw symmetric key bytes, validated per algorithm.
//!
//! CBC keys are the literal UTF-8 bytes of the caller's string. There is no
//! hashing, stretching, padding or truncation, so only strings of exactly the
//! right byte length work. AEAD keys travel as Base64 (the form produced by key
//! generation) and are decoded here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::SecureRandom;

/// Raw key bytes for a single call.
///
/// The buffer is zeroized on drop (clones included) and is never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Interpret `key` as literal key bytes (its UTF-8 encoding).
    pub fn from_text(key: &str) -> Self {
        Self(key.as_bytes().to_vec())
    }

    /// Decode a standard Base64 key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] if `key_b64` is not valid Base64.
    pub fn from_base64(key_b64: &str) -> Result<Self, CryptoError> {
        STANDARD
            .decode(key_b64)
            .map(Self)
            .map_err(|e| CryptoError::Encoding(format!("key is not valid base64: {e}")))
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Fresh `len`-byte key drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Random`] if the random source fails.
    pub fn random<R: SecureRandom + ?Sized>(len: usize, rng: &R) -> Result<Self, CryptoError> {
        let mut key = Self(vec![0u8; len]);
        rng.fill(&mut key.0)?;
        Ok(key)
    }

    /// Standard Base64 form, as handed back by key generation.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key size in bits.
    pub fn bit_len(&self) -> usize {
        self.0.len() * 8
    }

    /// Check the byte length against the sizes an algorithm accepts.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the length is not in `accepted`.
    pub fn ensure_len_in(&self, accepted: &[usize]) -> Result<(), CryptoError> {
        if accepted.contains(&self.0.len()) {
            Ok(())
        } else {
            Err(CryptoError::InvalidKey(format!(
                "key is {} bytes, expected one of {accepted:?}",
                self.0.len()
            )))
        }
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyMaterial({} bytes, [REDACTED])", self.0.len())
    }
}
