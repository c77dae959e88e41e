//! `symcrypt` — symmetric envelope encryption.
//!
//! Two families, both producing a self-contained Base64 envelope:
//!
//! - **CBC** ([`encrypt`], [`decrypt`], [`encrypt_with`], [`decrypt_with`]):
//!   `IV[16] || ciphertext`, padding per [`CipherSuite`]. Keys are the literal
//!   UTF-8 bytes of the caller's string and must be exactly 16, 24 or 32 bytes
//!   for AES. Confidentiality only.
//! - **AEAD** ([`encrypt_aead`], [`decrypt_aead`], [`generate_aead_key`]):
//!   AES-GCM, `nonce[12] || ciphertext || tag[16]`. Keys are Base64, as returned
//!   by [`generate_aead_key`]. Tampering is reported as
//!   [`CryptoError::Authentication`].
//!
//! Every call draws a fresh IV or nonce from the OS CSPRNG. Engines hold no
//! mutable state, so all functions are safe to call concurrently.
//!
//! ```
//! let key = symcrypt::generate_aead_key(256)?;
//! let sealed = symcrypt::encrypt_aead("hello world", &key)?;
//! assert_eq!(symcrypt::decrypt_aead(&sealed, &key)?, "hello world");
//! # Ok::<(), symcrypt::CryptoError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod telemetry;

pub use common::{CryptoError, Family};
pub use crate::config::Settings;
pub use crypto::{
    AeadEngine, Algorithm, CbcEngine, CipherSuite, Envelope, KeyMaterial, ModePadding, OsRandom,
    SecureRandom,
};

/// CBC-encrypt `plaintext` with `AES/CBC/PKCS5Padding`.
///
/// `key` is used byte-for-byte (no key derivation) and must be 16, 24 or 32 bytes of UTF-8.
pub fn encrypt(plaintext: &str, key: &str) -> Result<String, CryptoError> {
    encrypt_with(plaintext, key, CipherSuite::default())
}

/// Inverse of [`encrypt`].
pub fn decrypt(envelope_b64: &str, key: &str) -> Result<String, CryptoError> {
    decrypt_with(envelope_b64, key, CipherSuite::default())
}

/// CBC-encrypt `plaintext` under an explicit suite.
pub fn encrypt_with(plaintext: &str, key: &str, suite: CipherSuite) -> Result<String, CryptoError> {
    CbcEngine::new().encrypt(plaintext, &KeyMaterial::from_text(key), suite)
}

/// Inverse of [`encrypt_with`]; `suite` must match the one used to encrypt.
pub fn decrypt_with(
    envelope_b64: &str,
    key: &str,
    suite: CipherSuite,
) -> Result<String, CryptoError> {
    CbcEngine::new().decrypt(envelope_b64, &KeyMaterial::from_text(key), suite)
}

/// AES-GCM-encrypt `plaintext` with a Base64 key.
pub fn encrypt_aead(plaintext: &str, key_b64: &str) -> Result<String, CryptoError> {
    AeadEngine::new().encrypt(plaintext, &KeyMaterial::from_base64(key_b64)?)
}

/// Verify and decrypt an AES-GCM envelope with a Base64 key.
pub fn decrypt_aead(envelope_b64: &str, key_b64: &str) -> Result<String, CryptoError> {
    AeadEngine::new().decrypt(envelope_b64, &KeyMaterial::from_base64(key_b64)?)
}

/// Fresh Base64 AES key; `bits` must be 128, 192 or 256.
pub fn generate_aead_key(bits: u32) -> Result<String, CryptoError> {
    AeadEngine::new().generate_key(bits)
}
