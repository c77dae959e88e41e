//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No plaintext or key material** may appear in any span, event field or
//!   log message. Engines log suite names, key sizes and byte lengths only.
//! - Log level comes from `SYMCRYPT_LOG_LEVEL` (default: `info`) unless
//!   `RUST_LOG` overrides it.

pub mod init;

pub use init::init_tracing;
