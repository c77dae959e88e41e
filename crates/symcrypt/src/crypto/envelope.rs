//! Envelope framing: `prefix || payload`, carried as standard Base64.
//!
//! The prefix is the IV (CBC) or nonce (AEAD); its length is fixed per
//! [`Family`]. The payload is everything after it, including any tag.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{CryptoError, Family};

/// Concatenate `prefix` and `payload` in that order.
pub fn frame(prefix: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(prefix.len() + payload.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(payload);
    out
}

/// Split an envelope into its `prefix_len`-byte prefix and the remaining payload.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelope`] if `envelope` is shorter than `prefix_len`.
pub fn unframe(envelope: &[u8], prefix_len: usize) -> Result<(&[u8], &[u8]), CryptoError> {
    if envelope.len() < prefix_len {
        return Err(CryptoError::MalformedEnvelope {
            expected: prefix_len,
            actual: envelope.len(),
        });
    }
    Ok(envelope.split_at(prefix_len))
}

/// Standard padded Base64 (RFC 4648 §4).
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded Base64.
///
/// # Errors
///
/// Returns [`CryptoError::Encoding`] on any invalid character, length or padding.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::Encoding(e.to_string()))
}

/// A parsed envelope of a known family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Family the envelope was framed for.
    pub family: Family,
    /// IV or nonce bytes, exactly `family.prefix_len()` long.
    pub prefix: Vec<u8>,
    /// Ciphertext, with the tag appended for AEAD.
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Serialise to raw envelope bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        frame(&self.prefix, &self.payload)
    }

    /// Serialise to the Base64 transport form.
    pub fn to_base64(&self) -> String {
        encode(&self.to_bytes())
    }

    /// Parse raw envelope bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEnvelope`] if `bytes` is shorter than the family prefix.
    pub fn from_bytes(bytes: &[u8], family: Family) -> Result<Self, CryptoError> {
        let (prefix, payload) = unframe(bytes, family.prefix_len())?;
        Ok(Self {
            family,
            prefix: prefix.to_vec(),
            payload: payload.to_vec(),
        })
    }

    /// Parse the Base64 transport form.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] for invalid Base64 and
    /// [`CryptoError::MalformedEnvelope`] if the decoded bytes are too short.
    pub fn from_base64(text: &str, family: Family) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode(text)?, family)
    }
}
