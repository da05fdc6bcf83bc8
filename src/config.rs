//! Engine configuration
//!
//! Configuration is YAML. Every key is optional and falls back to the defaults of
//! a fresh document: nine bars of 4/4 in C major, treble clef, unbounded undo.
//!
//! ```yaml
//! initial_bar_count: 16
//! default_signature:
//!   ts: [3, 4]
//!   ks: -1
//!   clef: f
//! undo_limit: 200
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::{Signature, Song, DEFAULT_BAR_COUNT};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of empty bars in a fresh document
    pub initial_bar_count: usize,
    /// Signature anchored at bar 0 of a fresh document
    pub default_signature: Signature,
    /// Maximum undo depth
    pub undo_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_bar_count: DEFAULT_BAR_COUNT,
            default_signature: Signature::default(),
            undo_limit: None,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::info!("loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_bar_count == 0 {
            return Err(ConfigError::Invalid("initial_bar_count must be at least 1".to_string()));
        }
        let ts = self.default_signature.ts;
        if ts.num == 0 || ts.den == 0 {
            return Err(ConfigError::Invalid(format!(
                "default time signature {}/{} must have a non-zero numerator and denominator",
                ts.num, ts.den
            )));
        }
        if self.undo_limit == Some(0) {
            return Err(ConfigError::Invalid("undo_limit must be at least 1 when set".to_string()));
        }
        Ok(())
    }

    /// The fresh document this config describes
    pub fn initial_song(&self) -> Song {
        Song::new(self.initial_bar_count, self.default_signature)
    }
}
