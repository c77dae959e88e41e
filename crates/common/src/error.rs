//! Common error types shared across crates.

use thiserror::Error;

/// Every failure the encryption layer can report.
///
/// Variants map to stable machine-readable codes via [`CryptoError::code`]:
/// - [`CryptoError::InvalidKey`] → `invalid_key`
/// - [`CryptoError::MalformedEnvelope`] → `malformed_envelope`
/// - [`CryptoError::Encoding`] → `encoding`
/// - [`CryptoError::Decryption`] → `decryption`
/// - [`CryptoError::Authentication`] → `authentication`
/// - [`CryptoError::UnsupportedCipher`] → `unsupported_cipher`
/// - [`CryptoError::InvalidPlaintext`] → `invalid_plaintext`
/// - [`CryptoError::Random`] → `random_source`
///
/// Messages never carry key bytes or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key length (or requested bit size) is not accepted by the algorithm.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The decoded envelope is shorter than the fixed IV/nonce prefix.
    #[error("malformed envelope: expected at least {expected} bytes, got {actual}")]
    MalformedEnvelope {
        /// Prefix length required by the cipher family.
        expected: usize,
        /// Length of the envelope that was supplied.
        actual: usize,
    },

    /// The input was not valid standard Base64.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Cipher-level failure: bad padding, misaligned ciphertext, wrong key or IV,
    /// or a recovered plaintext that is not UTF-8.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The AEAD tag did not verify. The ciphertext was tampered with or the key is wrong.
    #[error("authentication failed: ciphertext or tag did not verify")]
    Authentication,

    /// The algorithm / mode / padding combination is not in the capability table.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// The plaintext cannot be encrypted under the chosen suite (e.g. unaligned input with no padding).
    #[error("invalid plaintext: {0}")]
    InvalidPlaintext(String),

    /// The secure random source could not produce bytes.
    #[error("secure random source failed: {0}")]
    Random(String),
}

impl CryptoError {
    /// Returns the stable code callers can switch on without matching message text.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::InvalidKey(_) => "invalid_key",
            CryptoError::MalformedEnvelope { .. } => "malformed_envelope",
            CryptoError::Encoding(_) => "encoding",
            CryptoError::Decryption(_) => "decryption",
            CryptoError::Authentication => "authentication",
            CryptoError::UnsupportedCipher(_) => "unsupported_cipher",
            CryptoError::InvalidPlaintext(_) => "invalid_plaintext",
            CryptoError::Random(_) => "random_source",
        }
    }
}
