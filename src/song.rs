//! Song input
//!
//! A song is a melody with its aligned beat-strength and key sequences, one
//! value per sixteenth-note tick, plus the score it was extracted from.

use serde::{Deserialize, Serialize};

use crate::error::{HarmonizerError, Result};
use crate::score::Score;

/// Melody values are MIDI pitches; 0 is a rest (and the padding value).
pub const MELODY_CLASSES: usize = 128;

/// Beat strength levels 0..=4
pub const BEAT_CLASSES: usize = 5;

/// Key signature classes; 0 is unknown/padding.
pub const KEY_CLASSES: usize = 16;

/// Beat level that marks the start of a bar.
pub const BAR_START: u8 = 4;

/// Melody value for "no note sounding".
pub const REST_PITCH: u8 = 0;

/// One song ready for harmonization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub melody: Vec<u8>,
    pub beat: Vec<u8>,
    pub key: Vec<u8>,
    pub score: Score,
    /// Source file name, used to name the output
    #[serde(default)]
    pub filename: String,
}

impl Song {
    /// Number of sixteenth-note ticks
    pub fn len(&self) -> usize {
        self.melody.len()
    }

    pub fn is_empty(&self) -> bool {
        self.melody.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        validate_sequences(&self.melody, &self.beat, &self.key)
    }
}

/// Check that the three sequences align tick for tick and every value is
/// inside its one-hot domain.
pub fn validate_sequences(melody: &[u8], beat: &[u8], key: &[u8]) -> Result<()> {
    if melody.len() != beat.len() || melody.len() != key.len() {
        return Err(HarmonizerError::LengthMismatch {
            melody: melody.len(),
            beat: beat.len(),
            key: key.len(),
        });
    }

    for (sequence, values, domain) in [
        ("melody", melody, MELODY_CLASSES),
        ("beat", beat, BEAT_CLASSES),
        ("key", key, KEY_CLASSES),
    ] {
        if let Some((tick, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| usize::from(**v) >= domain)
        {
            return Err(HarmonizerError::ValueOutOfDomain {
                sequence,
                tick,
                value,
                domain,
            });
        }
    }

    Ok(())
}
