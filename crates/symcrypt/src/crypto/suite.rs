//! Closed set of cipher configurations and the capability table behind them.
//!
//! An [`Algorithm`] and a [`ModePadding`] are chosen independently and then
//! looked up in [`PROFILES`]. Only pairs with a profile are usable; everything
//! else is rejected with [`CryptoError::UnsupportedCipher`] before any key or
//! randomness is touched. Supporting another pair means adding a profile and
//! binding its primitive in the CBC engine.

use std::fmt;
use std::str::FromStr;

use common::CryptoError;
use serde::Deserialize;

/// Block cipher algorithm, named as in JCE transformation strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Algorithm {
    /// AES; the variant (128/192/256) follows from the key length.
    Aes,
    /// Single DES.
    Des,
    /// Triple DES (EDE).
    DesEde,
}

impl Algorithm {
    /// Canonical name: `AES`, `DES`, `DESede`.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Aes => "AES",
            Algorithm::Des => "DES",
            Algorithm::DesEde => "DESede",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AES" => Ok(Algorithm::Aes),
            "DES" => Ok(Algorithm::Des),
            "DESEDE" | "TRIPLEDES" | "3DES" => Ok(Algorithm::DesEde),
            _ => Err(CryptoError::UnsupportedCipher(format!(
                "unknown algorithm: {s}"
            ))),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Block chaining mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Cbc,
    Ecb,
}

/// Padding scheme applied to the final block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Padding {
    /// PKCS#5 / PKCS#7.
    Pkcs5,
    /// Input must already be a whole number of blocks.
    None,
}

/// Mode and padding pair, named as the tail of a JCE transformation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ModePadding {
    CbcPkcs5Padding,
    CbcNoPadding,
    EcbPkcs5Padding,
    EcbNoPadding,
}

impl ModePadding {
    pub fn mode(self) -> Mode {
        match self {
            ModePadding::CbcPkcs5Padding | ModePadding::CbcNoPadding => Mode::Cbc,
            ModePadding::EcbPkcs5Padding | ModePadding::EcbNoPadding => Mode::Ecb,
        }
    }

    pub fn padding(self) -> Padding {
        match self {
            ModePadding::CbcPkcs5Padding | ModePadding::EcbPkcs5Padding => Padding::Pkcs5,
            ModePadding::CbcNoPadding | ModePadding::EcbNoPadding => Padding::None,
        }
    }

    /// Canonical name, e.g. `CBC/PKCS5Padding`.
    pub fn name(self) -> &'static str {
        match self {
            ModePadding::CbcPkcs5Padding => "CBC/PKCS5Padding",
            ModePadding::CbcNoPadding => "CBC/NoPadding",
            ModePadding::EcbPkcs5Padding => "ECB/PKCS5Padding",
            ModePadding::EcbNoPadding => "ECB/NoPadding",
        }
    }
}

impl fmt::Display for ModePadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModePadding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CryptoError::UnsupportedCipher(format!("unknown mode/padding: {s}"));
        let (mode, padding) = s.trim().split_once('/').ok_or_else(unknown)?;
        let mode = match mode.to_ascii_uppercase().as_str() {
            "CBC" => Mode::Cbc,
            "ECB" => Mode::Ecb,
            _ => return Err(unknown()),
        };
        let padding = match padding.to_ascii_uppercase().as_str() {
            "PKCS5PADDING" | "PKCS7PADDING" => Padding::Pkcs5,
            "NOPADDING" => Padding::None,
            _ => return Err(unknown()),
        };
        Ok(match (mode, padding) {
            (Mode::Cbc, Padding::Pkcs5) => ModePadding::CbcPkcs5Padding,
            (Mode::Cbc, Padding::None) => ModePadding::CbcNoPadding,
            (Mode::Ecb, Padding::Pkcs5) => ModePadding::EcbPkcs5Padding,
            (Mode::Ecb, Padding::None) => ModePadding::EcbNoPadding,
        })
    }
}

impl TryFrom<String> for ModePadding {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// An algorithm together with its mode and padding.
///
/// Renders and parses as a JCE transformation string (`AES/CBC/PKCS5Padding`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherSuite {
    pub algorithm: Algorithm,
    pub mode_padding: ModePadding,
}

impl CipherSuite {
    pub const fn new(algorithm: Algorithm, mode_padding: ModePadding) -> Self {
        Self {
            algorithm,
            mode_padding,
        }
    }

    /// Look this suite up in the capability table.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedCipher`] if no profile exists for it.
    pub fn profile(self) -> Result<&'static CipherProfile, CryptoError> {
        PROFILES
            .iter()
            .find(|p| p.suite == self)
            .ok_or_else(|| CryptoError::UnsupportedCipher(self.to_string()))
    }

    pub fn is_supported(self) -> bool {
        self.profile().is_ok()
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::new(Algorithm::Aes, ModePadding::CbcPkcs5Padding)
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.algorithm, self.mode_padding)
    }
}

impl FromStr for CipherSuite {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, mode_padding) = s.trim().split_once('/').ok_or_else(|| {
            CryptoError::UnsupportedCipher(format!("not a transformation string: {s}"))
        })?;
        Ok(Self::new(algorithm.parse()?, mode_padding.parse()?))
    }
}

/// Capability-table entry for a usable suite.
#[derive(Debug, PartialEq, Eq)]
pub struct CipherProfile {
    pub suite: CipherSuite,
    /// Key lengths in bytes the primitive accepts.
    pub key_sizes: &'static [usize],
    /// Cipher block size in bytes; also the IV length for CBC.
    pub block_size: usize,
}

const AES_KEY_SIZES: &[usize] = &[16, 24, 32];
const AES_BLOCK_SIZE: usize = 16;

/// Every suite the CBC engine can run.
pub static PROFILES: &[CipherProfile] = &[
    CipherProfile {
        suite: CipherSuite::new(Algorithm::Aes, ModePadding::CbcPkcs5Padding),
        key_sizes: AES_KEY_SIZES,
        block_size: AES_BLOCK_SIZE,
    },
    CipherProfile {
        suite: CipherSuite::new(Algorithm::Aes, ModePadding::CbcNoPadding),
        key_sizes: AES_KEY_SIZES,
        block_size: AES_BLOCK_SIZE,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_suite_is_aes_cbc_pkcs5() {
        let suite = CipherSuite::default();
        assert_eq!(suite.to_string(), "AES/CBC/PKCS5Padding");
        assert!(suite.is_supported());
    }

    #[test]
    fn parses_transformation_strings_case_insensitively() {
        let suite: CipherSuite = "AES/CBC/PKCS5PADDING".parse().unwrap();
        assert_eq!(suite, CipherSuite::default());

        let suite: CipherSuite = "aes/cbc/nopadding".parse().unwrap();
        assert_eq!(suite.mode_padding, ModePadding::CbcNoPadding);

        let suite: CipherSuite = "AES/CBC/PKCS7Padding".parse().unwrap();
        assert_eq!(suite.mode_padding, ModePadding::CbcPkcs5Padding);

        let suite: CipherSuite = "DESede/ECB/NoPadding".parse().unwrap();
        assert_eq!(suite.algorithm, Algorithm::DesEde);
        assert_eq!(suite.mode_padding.mode(), Mode::Ecb);
        assert_eq!(suite.mode_padding.padding(), Padding::None);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(
            "RSA/ECB/PKCS1Padding".parse::<CipherSuite>(),
            Err(CryptoError::UnsupportedCipher(_))
        ));
        assert!("AES/GCM/NoPadding".parse::<CipherSuite>().is_err());
        assert!("AES".parse::<CipherSuite>().is_err());
        assert!("CBC".parse::<ModePadding>().is_err());
    }

    #[test]
    fn only_aes_cbc_has_profiles() {
        let supported = [
            CipherSuite::new(Algorithm::Aes, ModePadding::CbcPkcs5Padding),
            CipherSuite::new(Algorithm::Aes, ModePadding::CbcNoPadding),
        ];
        for suite in supported {
            let profile = suite.profile().unwrap();
            assert_eq!(profile.block_size, 16);
            assert_eq!(profile.key_sizes, &[16, 24, 32]);
        }

        let rejected = [
            CipherSuite::new(Algorithm::Aes, ModePadding::EcbPkcs5Padding),
            CipherSuite::new(Algorithm::Des, ModePadding::CbcPkcs5Padding),
            CipherSuite::new(Algorithm::DesEde, ModePadding::CbcNoPadding),
        ];
        for suite in rejected {
            let err = suite.profile().unwrap_err();
            assert!(err.to_string().contains(&suite.to_string()));
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for algorithm in [Algorithm::Aes, Algorithm::Des, Algorithm::DesEde] {
            for mode_padding in [
                ModePadding::CbcPkcs5Padding,
                ModePadding::CbcNoPadding,
                ModePadding::EcbPkcs5Padding,
                ModePadding::EcbNoPadding,
            ] {
                let suite = CipherSuite::new(algorithm, mode_padding);
                assert_eq!(suite.to_string().parse::<CipherSuite>().unwrap(), suite);
            }
        }
    }
}
