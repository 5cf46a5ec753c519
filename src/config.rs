//! Run configuration
//!
//! Defaults, overridden by an optional JSON file, overridden in turn by
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decoder::{RhythmPolicy, DEFAULT_GAMMA, DEFAULT_SEGMENT_LENGTH};
use crate::error::{HarmonizerError, Result};

/// Composer line written by the watermark
pub const DEFAULT_COMPOSER_CREDIT: &str = "harmonized by harmonizer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizerConfig {
    /// Context ticks on each side of the decoded tick
    pub segment_length: usize,
    /// Repetition pull for free rhythm, in (0, 1]
    pub rhythm_gamma: f32,
    /// At most one chord change per bar; overrides `rhythm_gamma`
    pub chord_per_bar: bool,
    /// Write the current chord again at every bar start
    pub repeat_chord: bool,
    /// Stamp title, composer and provenance into exported scores
    pub watermark: bool,
    /// Harmonize songs on a thread pool
    pub parallel: bool,
    pub vocabulary_path: PathBuf,
    pub inputs_path: PathBuf,
    pub outputs_path: PathBuf,
    pub composer_credit: String,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_SEGMENT_LENGTH,
            rhythm_gamma: DEFAULT_GAMMA,
            chord_per_bar: false,
            repeat_chord: false,
            watermark: true,
            parallel: false,
            vocabulary_path: PathBuf::from("chord_types.json"),
            inputs_path: PathBuf::from("inputs"),
            outputs_path: PathBuf::from("outputs"),
            composer_credit: DEFAULT_COMPOSER_CREDIT.to_string(),
        }
    }
}

impl HarmonizerConfig {
    /// Read a JSON config file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HarmonizerError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment_length == 0 {
            return Err(HarmonizerError::InvalidConfig {
                reason: "segment_length must be at least 1".to_string(),
            });
        }
        if !(self.rhythm_gamma > 0.0 && self.rhythm_gamma <= 1.0) {
            return Err(HarmonizerError::InvalidConfig {
                reason: format!("rhythm_gamma {} must be in (0, 1]", self.rhythm_gamma),
            });
        }
        Ok(())
    }

    /// The rhythm policy these settings select.
    pub fn rhythm_policy(&self) -> Result<RhythmPolicy> {
        if self.chord_per_bar {
            Ok(RhythmPolicy::ChordPerBar)
        } else {
            RhythmPolicy::free(self.rhythm_gamma)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = HarmonizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.segment_length, 32);
        assert!(config.watermark);
        assert_eq!(
            config.rhythm_policy().unwrap(),
            RhythmPolicy::Free { gamma: 0.5 }
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"chord_per_bar": true, "segment_length": 8}}"#).unwrap();

        let config = HarmonizerConfig::load(file.path()).unwrap();
        assert_eq!(config.segment_length, 8);
        assert_eq!(config.rhythm_policy().unwrap(), RhythmPolicy::ChordPerBar);
        assert_eq!(config.outputs_path, PathBuf::from("outputs"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = HarmonizerConfig {
            segment_length: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().error_code(), "INVALID_CONFIG");

        let config = HarmonizerConfig {
            rhythm_gamma: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = HarmonizerConfig::load(Path::new("/nonexistent/harmonizer.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ");
    }
}
