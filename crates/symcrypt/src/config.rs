//! Default cipher selection and log level, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `SYMCRYPT_ALGORITHM` | `AES` |
//! | `SYMCRYPT_MODE_PADDING` | `CBC/PKCS5Padding` |
//! | `SYMCRYPT_LOG_LEVEL` | `info` |
//!
//! Loading fails with a clear message if a value does not parse or names a
//! suite the CBC engine cannot run.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{Algorithm, CipherSuite, ModePadding};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SYMCRYPT";

/// Validated library settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Block cipher for callers that take their suite from settings.
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// Mode and padding paired with `algorithm`.
    #[serde(default = "default_mode_padding")]
    pub mode_padding: ModePadding,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_algorithm() -> Algorithm {
    Algorithm::Aes
}
fn default_mode_padding() -> ModePadding {
    ModePadding::CbcPkcs5Padding
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            mode_padding: default_mode_padding(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load and validate settings from `SYMCRYPT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the resulting suite is unsupported.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration from environment")?;
        Self::from_config(cfg)
    }

    /// Deserialise and validate an already-built configuration.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        let s: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise symcrypt settings")?;
        s.validate()?;
        Ok(s)
    }

    /// The configured cipher suite.
    pub fn suite(&self) -> CipherSuite {
        CipherSuite::new(self.algorithm, self.mode_padding)
    }

    fn validate(&self) -> Result<()> {
        let suite = self.suite();
        suite.profile().with_context(|| {
            format!("SYMCRYPT_ALGORITHM / SYMCRYPT_MODE_PADDING name an unsupported suite: {suite}")
        })?;
        if self.log_level.trim().is_empty() {
            anyhow::bail!("SYMCRYPT_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
