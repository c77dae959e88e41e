//! AES-GCM encryption and decryption of text with a random per-call nonce.
//!
//! **Envelope:** `nonce (12) || ciphertext || tag (16)`, standard Base64.
//! AES-128, AES-192 or AES-256 is selected by key length.
//!
//! **Never reuse a nonce with the same key.** GCM nonce reuse is catastrophic:
//! it breaks both confidentiality and authentication. Every call draws a fresh
//! nonce from the engine's [`SecureRandom`].
//!
//! Verification and decryption are a single step in the primitive: on a tag
//! mismatch no plaintext, partial or otherwise, leaves this module.

use aes::Aes192;
use aes_gcm::{
    aead::{consts::U12, generic_array::GenericArray, Aead, KeyInit},
    Aes128Gcm, Aes256Gcm, AesGcm,
};
use common::wire::GCM_NONCE_LEN;
use common::CryptoError;
use tracing::{debug, warn};

use super::envelope::{self, frame, unframe};
use super::key::KeyMaterial;
use super::random::{random_array, OsRandom, SecureRandom};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Key lengths in bytes AES-GCM accepts.
pub const KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Key sizes in bits accepted by [`AeadEngine::generate_key`].
pub const KEY_BITS: [u32; 3] = [128, 192, 256];

/// Stateless AES-GCM engine over an injected random source.
#[derive(Debug, Clone, Default)]
pub struct AeadEngine<R = OsRandom> {
    rng: R,
}

impl AeadEngine {
    /// Engine backed by the operating-system CSPRNG.
    pub fn new() -> Self {
        Self { rng: OsRandom }
    }
}

impl<R: SecureRandom> AeadEngine<R> {
    /// Engine backed by a caller-supplied random source.
    pub fn with_random(rng: R) -> Self {
        Self { rng }
    }

    /// Encrypt UTF-8 text and return the Base64 envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
    /// Returns [`CryptoError::Random`] if no nonce could be drawn.
    pub fn encrypt(&self, plaintext: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
        let envelope = self.encrypt_bytes(plaintext.as_bytes(), key)?;
        Ok(envelope::encode(&envelope))
    }

    /// Verify and decrypt a Base64 envelope back to UTF-8 text.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
    /// - [`CryptoError::Encoding`] if `envelope_b64` is not valid Base64.
    /// - [`CryptoError::MalformedEnvelope`] if it is shorter than the nonce.
    /// - [`CryptoError::Authentication`] if the tag does not verify (wrong key or tampered data).
    /// - [`CryptoError::Decryption`] if the verified plaintext is not UTF-8.
    pub fn decrypt(&self, envelope_b64: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
        key.ensure_len_in(&KEY_SIZES)?;
        let envelope = envelope::decode(envelope_b64)?;
        let plaintext = self.decrypt_bytes(&envelope, key)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".into()))
    }

    /// Encrypt raw bytes and return raw envelope bytes.
    pub fn encrypt_bytes(&self, plaintext: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
        key.ensure_len_in(&KEY_SIZES)?;
        let nonce: [u8; GCM_NONCE_LEN] = random_array(&self.rng)?;

        let ciphertext = match key.len() {
            16 => seal::<Aes128Gcm>(key, &nonce, plaintext)?,
            24 => seal::<Aes192Gcm>(key, &nonce, plaintext)?,
            32 => seal::<Aes256Gcm>(key, &nonce, plaintext)?,
            n => return Err(invalid_key_len(n)),
        };

        debug!(
            key_bits = key.bit_len(),
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "aead encrypt"
        );
        Ok(frame(&nonce, &ciphertext))
    }

    /// Verify and decrypt raw envelope bytes.
    pub fn decrypt_bytes(&self, envelope: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
        key.ensure_len_in(&KEY_SIZES)?;
        let (nonce, ciphertext) = unframe(envelope, GCM_NONCE_LEN)?;

        let opened = match key.len() {
            16 => open::<Aes128Gcm>(key, nonce, ciphertext),
            24 => open::<Aes192Gcm>(key, nonce, ciphertext),
            32 => open::<Aes256Gcm>(key, nonce, ciphertext),
            n => return Err(invalid_key_len(n)),
        };

        match opened {
            Ok(plaintext) => {
                debug!(
                    key_bits = key.bit_len(),
                    ciphertext_len = ciphertext.len(),
                    "aead decrypt"
                );
                Ok(plaintext)
            }
            Err(e) => {
                warn!(
                    key_bits = key.bit_len(),
                    ciphertext_len = ciphertext.len(),
                    "aead tag verification failed"
                );
                Err(e)
            }
        }
    }

    /// Generate a fresh AES key of `bits` bits and return it as Base64.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] unless `bits` is 128, 192 or 256.
    /// Returns [`CryptoError::Random`] if the random source fails.
    pub fn generate_key(&self, bits: u32) -> Result<String, CryptoError> {
        Ok(self.generate_key_material(bits)?.to_base64())
    }

    /// Like [`Self::generate_key`] but returns the raw [`KeyMaterial`].
    pub fn generate_key_material(&self, bits: u32) -> Result<KeyMaterial, CryptoError> {
        if !KEY_BITS.contains(&bits) {
            return Err(CryptoError::InvalidKey(format!(
                "unsupported key size {bits} bits; expected one of {KEY_BITS:?}"
            )));
        }
        let key = KeyMaterial::random(bits as usize / 8, &self.rng)?;
        debug!(key_bits = bits, "aead key generated");
        Ok(key)
    }
}

fn seal<C: Aead + KeyInit>(
    key: &KeyMaterial,
    nonce: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = C::new_from_slice(key.as_bytes()).map_err(|_| invalid_key_len(key.len()))?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::InvalidPlaintext("plaintext exceeds AES-GCM length limit".into()))
}

fn open<C: Aead + KeyInit>(
    key: &KeyMaterial,
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = C::new_from_slice(key.as_bytes()).map_err(|_| invalid_key_len(key.len()))?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}

fn invalid_key_len(len: usize) -> CryptoError {
    CryptoError::InvalidKey(format!("AES-GCM key must be 16, 24 or 32 bytes, got {len}"))
}
