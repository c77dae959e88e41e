//! Common error types and envelope wire layout shared across `symcrypt` crates.

pub mod error;
pub mod wire;

pub use error::CryptoError;
pub use wire::Family;
