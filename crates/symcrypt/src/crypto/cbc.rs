//! Block-cipher envelope encryption in CBC mode.
//!
//! Envelope: `IV (16) || ciphertext`, standard Base64. The IV is drawn fresh
//! from the engine's [`SecureRandom`] on every call.
//!
//! CBC gives confidentiality only. A flipped ciphertext bit may or may not
//! surface as a padding error; callers that need tamper detection must use the
//! [`AeadEngine`](super::aead::AeadEngine).

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::{NoPadding, Pkcs7},
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};
use common::wire::CBC_IV_LEN;
use common::CryptoError;
use tracing::debug;

use super::envelope::{self, frame, unframe};
use super::key::KeyMaterial;
use super::random::{random_array, OsRandom, SecureRandom};
use super::suite::{Algorithm, CipherProfile, CipherSuite, Padding};

/// Stateless CBC encrypt/decrypt over an injected random source.
///
/// Cheap to share across threads: it holds nothing but the random source.
#[derive(Debug, Clone, Default)]
pub struct CbcEngine<R = OsRandom> {
    rng: R,
}

impl CbcEngine {
    /// Engine backed by the operating-system CSPRNG.
    pub fn new() -> Self {
        Self { rng: OsRandom }
    }
}

impl<R: SecureRandom> CbcEngine<R> {
    /// Engine backed by a caller-supplied random source.
    pub fn with_random(rng: R) -> Self {
        Self { rng }
    }

    /// Encrypt UTF-8 text and return the Base64 envelope.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::UnsupportedCipher`] if `suite` has no profile.
    /// - [`CryptoError::InvalidKey`] if the key length does not fit the algorithm.
    /// - [`CryptoError::InvalidPlaintext`] for unaligned input under `NoPadding`.
    /// - [`CryptoError::Random`] if no IV could be drawn.
    pub fn encrypt(
        &self,
        plaintext: &str,
        key: &KeyMaterial,
        suite: CipherSuite,
    ) -> Result<String, CryptoError> {
        let envelope = self.encrypt_bytes(plaintext.as_bytes(), key, suite)?;
        Ok(envelope::encode(&envelope))
    }

    /// Decrypt a Base64 envelope back to UTF-8 text.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::UnsupportedCipher`] / [`CryptoError::InvalidKey`] as for [`Self::encrypt`].
    /// - [`CryptoError::Encoding`] if `envelope_b64` is not valid Base64.
    /// - [`CryptoError::MalformedEnvelope`] if it is shorter than the IV.
    /// - [`CryptoError::Decryption`] on bad padding, misaligned ciphertext or non-UTF-8 output.
    pub fn decrypt(
        &self,
        envelope_b64: &str,
        key: &KeyMaterial,
        suite: CipherSuite,
    ) -> Result<String, CryptoError> {
        let profile = resolve(key, suite)?;
        let envelope = envelope::decode(envelope_b64)?;
        let plaintext = open(profile, key, &envelope)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".into()))
    }

    /// Encrypt raw bytes and return raw envelope bytes.
    pub fn encrypt_bytes(
        &self,
        plaintext: &[u8],
        key: &KeyMaterial,
        suite: CipherSuite,
    ) -> Result<Vec<u8>, CryptoError> {
        let profile = resolve(key, suite)?;
        let padding = suite.mode_padding.padding();
        if padding == Padding::None && plaintext.len() % profile.block_size != 0 {
            return Err(CryptoError::InvalidPlaintext(format!(
                "{} requires a multiple of {} bytes, got {}",
                suite,
                profile.block_size,
                plaintext.len()
            )));
        }

        let iv: [u8; CBC_IV_LEN] = random_array(&self.rng)?;
        let ciphertext = match suite.algorithm {
            Algorithm::Aes => match key.len() {
                16 => encrypt_blocks::<Aes128>(key, &iv, plaintext, padding)?,
                24 => encrypt_blocks::<Aes192>(key, &iv, plaintext, padding)?,
                32 => encrypt_blocks::<Aes256>(key, &iv, plaintext, padding)?,
                n => return Err(invalid_key_len(n)),
            },
            _ => return Err(CryptoError::UnsupportedCipher(suite.to_string())),
        };

        debug!(
            suite = %suite,
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "cbc encrypt"
        );
        Ok(frame(&iv, &ciphertext))
    }

    /// Decrypt raw envelope bytes and return raw plaintext bytes.
    pub fn decrypt_bytes(
        &self,
        envelope: &[u8],
        key: &KeyMaterial,
        suite: CipherSuite,
    ) -> Result<Vec<u8>, CryptoError> {
        let profile = resolve(key, suite)?;
        open(profile, key, envelope)
    }
}

/// Look up the suite and check the key against it.
fn resolve(key: &KeyMaterial, suite: CipherSuite) -> Result<&'static CipherProfile, CryptoError> {
    let profile = suite.profile()?;
    key.ensure_len_in(profile.key_sizes)?;
    Ok(profile)
}

fn open(
    profile: &CipherProfile,
    key: &KeyMaterial,
    envelope: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let suite = profile.suite;
    let (iv, ciphertext) = unframe(envelope, CBC_IV_LEN)?;
    let padding = suite.mode_padding.padding();

    if ciphertext.len() % profile.block_size != 0 {
        return Err(CryptoError::Decryption(format!(
            "ciphertext is not a multiple of {} bytes",
            profile.block_size
        )));
    }
    if padding == Padding::Pkcs5 && ciphertext.is_empty() {
        return Err(CryptoError::Decryption("ciphertext is empty".into()));
    }

    let plaintext = match suite.algorithm {
        Algorithm::Aes => match key.len() {
            16 => decrypt_blocks::<Aes128>(key, iv, ciphertext, padding)?,
            24 => decrypt_blocks::<Aes192>(key, iv, ciphertext, padding)?,
            32 => decrypt_blocks::<Aes256>(key, iv, ciphertext, padding)?,
            n => return Err(invalid_key_len(n)),
        },
        _ => return Err(CryptoError::UnsupportedCipher(suite.to_string())),
    };

    debug!(
        suite = %suite,
        ciphertext_len = ciphertext.len(),
        plaintext_len = plaintext.len(),
        "cbc decrypt"
    );
    Ok(plaintext)
}

fn encrypt_blocks<C>(
    key: &KeyMaterial,
    iv: &[u8],
    plaintext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| invalid_key_len(key.len()))?;
    Ok(match padding {
        Padding::Pkcs5 => encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        Padding::None => encryptor.encrypt_padded_vec_mut::<NoPadding>(plaintext),
    })
}

fn decrypt_blocks<C>(
    key: &KeyMaterial,
    iv: &[u8],
    ciphertext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| invalid_key_len(key.len()))?;
    let unpadded = match padding {
        Padding::Pkcs5 => decryptor.decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        Padding::None => decryptor.decrypt_padded_vec_mut::<NoPadding>(ciphertext),
    };
    // Padding failures and wrong keys must stay indistinguishable to callers.
    unpadded.map_err(|_| CryptoError::Decryption("bad padding or wrong key".into()))
}

fn invalid_key_len(len: usize) -> CryptoError {
    CryptoError::InvalidKey(format!("AES key must be 16, 24 or 32 bytes, got {len}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::MockSecureRandom;
    use crate::crypto::suite::ModePadding;

    const KEY: &str = "0123456789abcdef";

    fn counting_iv() -> MockSecureRandom {
        let mut rng = MockSecureRandom::new();
        rng.expect_fill().returning(|dest| {
            for (i, b) in dest.iter_mut().enumerate() {
                *b = i as u8;
            }
            Ok(())
        });
        rng
    }

    fn no_padding() -> CipherSuite {
        CipherSuite::new(Algorithm::Aes, ModePadding::CbcNoPadding)
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let envelope = engine.encrypt("abc", &key, CipherSuite::default()).unwrap();
        let plaintext = engine.decrypt(&envelope, &key, CipherSuite::default()).unwrap();
        assert_eq!(plaintext, "abc");
    }

    #[test]
    fn envelope_is_iv_plus_one_padded_block() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let envelope = engine.encrypt("abc", &key, CipherSuite::default()).unwrap();
        let raw = envelope::decode(&envelope).unwrap();
        assert_eq!(raw.len(), 16 + 16);
    }

    #[test]
    fn block_aligned_plaintext_gets_full_padding_block() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let raw = engine
            .encrypt_bytes(&[0x41; 16], &key, CipherSuite::default())
            .unwrap();
        assert_eq!(raw.len(), 16 + 32);
    }

    #[test]
    fn all_aes_key_sizes_work() {
        let engine = CbcEngine::new();
        for key in [
            "0123456789abcdef",
            "0123456789abcdef01234567",
            "0123456789abcdef0123456789abcdef",
        ] {
            let key = KeyMaterial::from_text(key);
            let envelope = engine
                .encrypt("multi-size", &key, CipherSuite::default())
                .unwrap();
            assert_eq!(
                engine.decrypt(&envelope, &key, CipherSuite::default()).unwrap(),
                "multi-size"
            );
        }
    }

    #[test]
    fn same_input_encrypts_differently() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let a = engine.encrypt("same", &key, CipherSuite::default()).unwrap();
        let b = engine.encrypt("same", &key, CipherSuite::default()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn nist_sp800_38a_cbc_aes128_vector() {
        // SP 800-38A F.2.1, first two blocks.
        let key = KeyMaterial::from_bytes(&[
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ]);
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a, 0xae, 0x2d, 0x8a, 0x57, 0x1e, 0x03, 0xac, 0x9c, 0x9e, 0xb7, 0x6f, 0xac,
            0x45, 0xaf, 0x8e, 0x51,
        ];
        let expected_ciphertext = [
            0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9,
            0x19, 0x7d, 0x50, 0x86, 0xcb, 0x9b, 0x50, 0x72, 0x19, 0xee, 0x95, 0xdb, 0x11, 0x3a,
            0x91, 0x76, 0x78, 0xb2,
        ];

        let engine = CbcEngine::with_random(counting_iv());
        let raw = engine.encrypt_bytes(&plaintext, &key, no_padding()).unwrap();
        let (iv, ciphertext) = raw.split_at(16);
        assert_eq!(iv, (0u8..16).collect::<Vec<_>>().as_slice());
        assert_eq!(ciphertext, expected_ciphertext);

        let decrypted = engine.decrypt_bytes(&raw, &key, no_padding()).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn wrong_key_length_rejected() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text("too short");
        let err = engine.encrypt("x", &key, CipherSuite::default()).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
        let err = engine
            .decrypt("AAAAAAAAAAAAAAAAAAAAAA==", &key, CipherSuite::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }

    #[test]
    fn unsupported_suite_rejected_before_drawing_iv() {
        // No expectations: any call to fill() would panic the mock.
        let engine = CbcEngine::with_random(MockSecureRandom::new());
        let key = KeyMaterial::from_text(KEY);
        for suite in ["AES/ECB/PKCS5Padding", "DES/CBC/PKCS5Padding", "DESede/CBC/NoPadding"] {
            let suite: CipherSuite = suite.parse().unwrap();
            let err = engine.encrypt("x", &key, suite).unwrap_err();
            assert!(matches!(err, CryptoError::UnsupportedCipher(_)));
        }
    }

    #[test]
    fn no_padding_requires_aligned_plaintext() {
        let engine = CbcEngine::with_random(MockSecureRandom::new());
        let key = KeyMaterial::from_text(KEY);
        let err = engine.encrypt("abc", &key, no_padding()).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPlaintext(_)));
    }

    #[test]
    fn short_envelope_is_malformed() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let short = envelope::encode(&[0u8; 10]);
        let err = engine.decrypt(&short, &key, CipherSuite::default()).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::MalformedEnvelope {
                expected: 16,
                actual: 10
            }
        ));
    }

    #[test]
    fn invalid_base64_is_encoding_error() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let err = engine
            .decrypt("not*base64", &key, CipherSuite::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Encoding(_)));
    }

    #[test]
    fn misaligned_or_empty_ciphertext_is_decryption_error() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);

        let iv_only = envelope::encode(&[0u8; 16]);
        let err = engine.decrypt(&iv_only, &key, CipherSuite::default()).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));

        let misaligned = envelope::encode(&[0u8; 16 + 5]);
        let err = engine
            .decrypt(&misaligned, &key, CipherSuite::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));
    }

    #[test]
    fn wrong_key_never_yields_original_plaintext() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let other = KeyMaterial::from_text("fedcba9876543210");
        let envelope = engine
            .encrypt("attack at dawn", &key, CipherSuite::default())
            .unwrap();
        let result = engine.decrypt(&envelope, &other, CipherSuite::default());
        assert_ne!(result.ok().as_deref(), Some("attack at dawn"));
    }

    #[test]
    fn non_utf8_plaintext_is_decryption_error() {
        let engine = CbcEngine::new();
        let key = KeyMaterial::from_text(KEY);
        let raw = engine
            .encrypt_bytes(&[0xff, 0xfe], &key, CipherSuite::default())
            .unwrap();
        let envelope = envelope::encode(&raw);
        let err = engine
            .decrypt(&envelope, &key, CipherSuite::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));
        assert_eq!(
            engine.decrypt_bytes(&raw, &key, CipherSuite::default()).unwrap(),
            vec![0xff, 0xfe]
        );
    }

    #[test]
    fn random_failure_propagates() {
        let mut rng = MockSecureRandom::new();
        rng.expect_fill()
            .returning(|_| Err(CryptoError::Random("entropy unavailable".into())));
        let engine = CbcEngine::with_random(rng);
        let key = KeyMaterial::from_text(KEY);
        let err = engine.encrypt("x", &key, CipherSuite::default()).unwrap_err();
        assert!(matches!(err, CryptoError::Random(_)));
    }
}
