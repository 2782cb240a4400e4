// ============================================================================
// src/config.rs – strict loader for derivation parameters
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::{DerivationFailed, KdfError};
use crate::util::kdf::check_params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KdfParams {
    /// Work factor: chained HMAC applications per output block.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Derived key length in bytes.
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    #[serde(default)]
    pub hash: HashAlgorithm,
}

fn default_rounds() -> u32 {
    4096
}

fn default_key_length() -> usize {
    32
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            key_length: default_key_length(),
            hash: HashAlgorithm::default(),
        }
    }
}

impl KdfParams {
    /// Load parameters from TOML (`.toml`), JSON (`.json`) or YAML (anything else).
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let path = p.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read kdf params: {}", path.display()))?;
        let params: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s).context("toml parse")?,
            Some("json") => serde_json::from_str(&s).context("json parse")?,
            _ => serde_yaml::from_str(&s).context("yaml parse")?,
        };
        params
            .check()
            .with_context(|| format!("invalid kdf params in {}", path.display()))?;
        Ok(params)
    }

    /// Check rounds and key length; salt is supplied per call.
    pub fn check(&self) -> Result<(), KdfError> {
        let probe = [0u8; 1];
        let checked = match self.hash {
            HashAlgorithm::Sha1 => check_params::<Sha1>(&probe, self.key_length, self.rounds),
            HashAlgorithm::Sha256 => check_params::<Sha256>(&probe, self.key_length, self.rounds),
        };
        checked.map(|_| ())
    }

    /// Derive a key from `password` and `salt` with these parameters.
    pub fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, DerivationFailed> {
        match self.hash {
            HashAlgorithm::Sha1 => {
                crate::derive_with::<Sha1>(password, salt, self.key_length, self.rounds)
            }
            HashAlgorithm::Sha256 => {
                crate::derive_with::<Sha256>(password, salt, self.key_length, self.rounds)
            }
        }
    }
}
