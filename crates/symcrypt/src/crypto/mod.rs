//! Symmetric envelope encryption primitives.
//!
//! This module is free of configuration and logging setup. It provides the
//! two engines, the key wrapper and the envelope codec they share.
//!
//! # Envelope formats
//!
//! ```text
//! CBC:  base64( IV[16] || ciphertext )
//! AEAD: base64( nonce[12] || ciphertext || tag[16] )
//! ```

pub mod aead;
pub mod cbc;
pub mod envelope;
pub mod key;
pub mod random;
pub mod suite;

pub use aead::AeadEngine;
pub use cbc::CbcEngine;
pub use envelope::Envelope;
pub use key::KeyMaterial;
pub use random::{OsRandom, SecureRandom};
pub use suite::{Algorithm, CipherProfile, CipherSuite, ModePadding};
