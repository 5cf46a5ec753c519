//! Harmonic rhythm policy
//!
//! A step-wise classifier changes chord far more often than tonal music does.
//! The policy decides how strongly each step is pulled back toward the chord
//! decoded at the previous tick.

use serde::{Deserialize, Serialize};

use super::context::PaddedSong;
use crate::error::{HarmonizerError, Result};
use crate::song::{BAR_START, REST_PITCH};

/// Default repetition weight for free rhythm
pub const DEFAULT_GAMMA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RhythmPolicy {
    /// Constant pull toward the previous chord; higher gamma, fewer changes.
    Free { gamma: f32 },
    /// Repeat the previous chord except where a bar starts with a new event.
    ChordPerBar,
}

impl Default for RhythmPolicy {
    fn default() -> Self {
        RhythmPolicy::Free {
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl RhythmPolicy {
    pub fn free(gamma: f32) -> Result<Self> {
        if !(gamma > 0.0 && gamma <= 1.0) {
            return Err(HarmonizerError::InvalidConfig {
                reason: format!("rhythm gamma {gamma} must be in (0, 1]"),
            });
        }
        Ok(RhythmPolicy::Free { gamma })
    }

    /// Weight of the bias toward the previous chord at padded position
    /// `position`.
    pub fn repetition_weight(&self, song: &PaddedSong, position: usize) -> f32 {
        match *self {
            RhythmPolicy::Free { gamma } => gamma,
            RhythmPolicy::ChordPerBar => {
                if is_free_bar_start(song, position) {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// A bar start where something new happens: the beat is the strongest
/// level, and the melody or the beat level differs from the previous tick.
/// A song that opens on a rest does not count.
fn is_free_bar_start(song: &PaddedSong, position: usize) -> bool {
    let melody = song.melody_at(position);
    let beat = song.beat_at(position);
    let changed = melody != song.melody_at(position - 1) || beat != song.beat_at(position - 1);
    let opens_on_rest = position == song.segment_length() && melody == REST_PITCH;

    beat == BAR_START && changed && !opens_on_rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_gamma_validation() {
        assert!(RhythmPolicy::free(0.5).is_ok());
        assert!(RhythmPolicy::free(1.0).is_ok());
        assert!(RhythmPolicy::free(0.0).is_err());
        assert!(RhythmPolicy::free(1.5).is_err());
        assert!(RhythmPolicy::free(f32::NAN).is_err());
    }

    #[test]
    fn test_free_weight_is_constant() {
        let song = PaddedSong::new(&[60, 62], &[4, 0], &[8, 8], 2).unwrap();
        let policy = RhythmPolicy::free(0.3).unwrap();
        assert_eq!(policy.repetition_weight(&song, 2), 0.3);
        assert_eq!(policy.repetition_weight(&song, 3), 0.3);
    }

    #[test]
    fn test_chord_per_bar_weights() {
        // Beats: bar start, inside, bar start, bar start again, inside.
        let song = PaddedSong::new(
            &[60, 60, 60, 62, 62],
            &[4, 0, 4, 4, 0],
            &[8, 8, 8, 8, 8],
            2,
        )
        .unwrap();
        let policy = RhythmPolicy::ChordPerBar;

        // First tick: bar start after padding.
        assert_eq!(policy.repetition_weight(&song, 2), 0.0);
        // Inside a bar.
        assert_eq!(policy.repetition_weight(&song, 3), 1.0);
        // Bar start, beat changed from 0 to 4.
        assert_eq!(policy.repetition_weight(&song, 4), 0.0);
        // Bar start, beat unchanged but melody changed.
        assert_eq!(policy.repetition_weight(&song, 5), 0.0);
        assert_eq!(policy.repetition_weight(&song, 6), 1.0);
    }

    #[test]
    fn test_chord_per_bar_repeated_bar_start_without_change() {
        let song = PaddedSong::new(&[60, 60], &[4, 4], &[8, 8], 1).unwrap();
        assert_eq!(RhythmPolicy::ChordPerBar.repetition_weight(&song, 2), 1.0);
    }

    #[test]
    fn test_chord_per_bar_song_opening_on_rest() {
        let song = PaddedSong::new(&[0, 60], &[4, 0], &[8, 8], 2).unwrap();
        assert_eq!(RhythmPolicy::ChordPerBar.repetition_weight(&song, 2), 1.0);
    }
}
