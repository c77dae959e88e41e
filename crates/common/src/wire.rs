//! Byte layout of encrypted envelopes.
//!
//! ```text
//! CBC:  [ IV (16) ][ ciphertext (padded to the block size) ]
//! AEAD: [ nonce (12) ][ ciphertext ][ tag (16) ]
//! ```
//!
//! The whole envelope is standard, padded Base64 on the wire.

use std::fmt;

/// Byte length of a CBC initialisation vector.
pub const CBC_IV_LEN: usize = 16;

/// Byte length of an AES-GCM nonce (96 bits).
pub const GCM_NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (128 bits).
pub const GCM_TAG_LEN: usize = 16;

/// Cipher family an envelope belongs to. Determines the prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Block cipher in CBC mode with padding; IV-prefixed, no integrity.
    Cbc,
    /// AES-GCM; nonce-prefixed, tag appended to the ciphertext.
    Aead,
}

impl Family {
    /// Length of the IV / nonce prefix.
    pub const fn prefix_len(self) -> usize {
        match self {
            Family::Cbc => CBC_IV_LEN,
            Family::Aead => GCM_NONCE_LEN,
        }
    }

    /// Length of the trailing authentication tag, zero for unauthenticated families.
    pub const fn tag_len(self) -> usize {
        match self {
            Family::Cbc => 0,
            Family::Aead => GCM_TAG_LEN,
        }
    }

    /// Smallest envelope that can possibly decrypt.
    pub const fn min_envelope_len(self) -> usize {
        self.prefix_len() + self.tag_len()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Cbc => f.write_str("cbc"),
            Family::Aead => f.write_str("aead"),
        }
    }
}
