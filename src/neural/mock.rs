//! Weights-free chord models
//!
//! These models don't need a trained artifact. `FixedDistributionModel` is a
//! deterministic stub for tests; `MelodyFitModel` is a small music-theory
//! heuristic that lets the CLI harmonize end to end without learned weights.

use super::model::{softmax, ChordModel, ChordModelInfo};
use crate::decoder::{hot_index, EncodedContext};
use crate::error::{HarmonizerError, Result};
use crate::harmony::{normalize_symbol, ChordSymbol, REST_SYMBOL};
use crate::song::{KEY_CLASSES, REST_PITCH};
use crate::vocab::Vocabulary;

/// Always returns the same distribution, whatever the context.
pub struct FixedDistributionModel {
    info: ChordModelInfo,
    probabilities: Vec<f32>,
}

impl FixedDistributionModel {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self {
            info: ChordModelInfo::new(
                "fixed",
                "Fixed Distribution",
                "1.0",
                "Returns one distribution for every tick",
            ),
            probabilities,
        }
    }

    /// Equal probability for every vocabulary index.
    pub fn uniform(vocab_size: usize) -> Self {
        let mut model = Self::new(vec![1.0 / vocab_size.max(1) as f32; vocab_size]);
        model.info = ChordModelInfo::new(
            "uniform",
            "Uniform",
            "1.0",
            "Equal probability for every chord; harmonic rhythm comes only from the bias",
        );
        model
    }
}

impl ChordModel for FixedDistributionModel {
    fn info(&self) -> &ChordModelInfo {
        &self.info
    }

    fn predict(&self, _context: &EncodedContext) -> Result<Vec<f32>> {
        Ok(self.probabilities.clone())
    }
}

// Score weights for the melody-fit heuristic
const CURRENT_TONE_WEIGHT: f32 = 2.0;
const UPCOMING_TONES_WEIGHT: f32 = 1.5;
const DIATONIC_ROOT_WEIGHT: f32 = 1.0;
const REST_OVER_SILENCE: f32 = 3.0;
const REST_OVER_NOTE: f32 = -1.0;

const MAJOR_SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Tonic pitch class of a key class.
///
/// Key classes are key-signature sharps offset by 8 (`8` = no accidentals,
/// `9` = one sharp, `7` = one flat); class 0 is unknown.
pub fn key_tonic(key_class: usize) -> Option<u8> {
    if key_class == 0 || key_class >= KEY_CLASSES {
        return None;
    }
    let sharps = key_class as i32 - 8;
    Some((sharps * 7).rem_euclid(12) as u8)
}

/// Scores every chord by how well it fits the melody around the decode
/// position: chord tones under the current note, chord tones among the
/// upcoming notes, and a root inside the current key.
pub struct MelodyFitModel {
    info: ChordModelInfo,
    /// Parsed vocabulary; `None` for the rest symbol and malformed entries
    chords: Vec<Option<ChordSymbol>>,
    rest_indices: Vec<bool>,
}

impl MelodyFitModel {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let normalized: Vec<String> = vocabulary
            .symbols()
            .iter()
            .map(|s| normalize_symbol(s))
            .collect();

        Self {
            info: ChordModelInfo::new(
                "melody-fit",
                "Melody Fit",
                "1.0",
                "Heuristic: favours chords containing the melody and rooted in the key",
            ),
            chords: normalized
                .iter()
                .map(|s| ChordSymbol::parse(s).ok())
                .collect(),
            rest_indices: normalized.iter().map(|s| s == REST_SYMBOL).collect(),
        }
    }

    fn score(&self, index: usize, current: usize, upcoming: &[usize], tonic: Option<u8>) -> f32 {
        if self.rest_indices[index] {
            return if current == usize::from(REST_PITCH) {
                REST_OVER_SILENCE
            } else {
                REST_OVER_NOTE
            };
        }
        let Some(chord) = &self.chords[index] else {
            return f32::NEG_INFINITY;
        };

        let mut score = 0.0;
        if current != usize::from(REST_PITCH) && chord.contains_pitch(current as u8) {
            score += CURRENT_TONE_WEIGHT;
        }
        if !upcoming.is_empty() {
            let fitting = upcoming
                .iter()
                .filter(|&&pitch| chord.contains_pitch(pitch as u8))
                .count();
            score += UPCOMING_TONES_WEIGHT * fitting as f32 / upcoming.len() as f32;
        }
        if let Some(tonic) = tonic {
            if MAJOR_SCALE.contains(&((chord.root + 12 - tonic) % 12)) {
                score += DIATONIC_ROOT_WEIGHT;
            }
        }
        score
    }
}

impl ChordModel for MelodyFitModel {
    fn info(&self) -> &ChordModelInfo {
        &self.info
    }

    fn predict(&self, context: &EncodedContext) -> Result<Vec<f32>> {
        let current = context
            .current_melody()
            .ok_or_else(|| HarmonizerError::ModelFailure {
                model: self.info.id.clone(),
                reason: "context has no melody at the decode position".to_string(),
            })?;
        let tonic = context.current_key().and_then(key_tonic);

        // Right window is reversed, so the upcoming notes are every row but
        // the last; padding and rests are skipped.
        let upcoming: Vec<usize> = context
            .melody_right
            .iter()
            .rev()
            .skip(1)
            .filter_map(|row| hot_index(row))
            .filter(|&pitch| pitch != usize::from(REST_PITCH))
            .collect();

        let scores: Vec<f32> = (0..self.chords.len())
            .map(|index| self.score(index, current, &upcoming, tonic))
            .collect();
        Ok(softmax(&scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::PaddedSong;

    fn vocab() -> Vocabulary {
        Vocabulary::new(
            ["N.C.", "C", "G", "F#", "Xyz"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    fn context(melody: &[u8], key: u8) -> EncodedContext {
        let beat = vec![0; melody.len()];
        let keys = vec![key; melody.len()];
        let padded = PaddedSong::new(melody, &beat, &keys, 4).unwrap();
        padded.window(4, &[0; 4]).encode(5)
    }

    #[test]
    fn test_fixed_distribution() {
        let model = FixedDistributionModel::new(vec![0.1, 0.7, 0.2]);
        let probs = model.predict(&context(&[60], 8)).unwrap();
        assert_eq!(probs, vec![0.1, 0.7, 0.2]);
        assert_eq!(model.id(), "fixed");
    }

    #[test]
    fn test_key_tonic() {
        assert_eq!(key_tonic(8), Some(0));
        assert_eq!(key_tonic(9), Some(7));
        assert_eq!(key_tonic(7), Some(5));
        assert_eq!(key_tonic(0), None);
    }

    #[test]
    fn test_melody_fit_prefers_chord_tones() {
        let model = MelodyFitModel::new(&vocab());
        // B over C major: G contains B, C does not.
        let probs = model.predict(&context(&[71, 67, 62], 8)).unwrap();
        assert!(probs[2] > probs[1]);
        assert!(probs[2] > probs[3]);
        // Malformed entries never win.
        assert_eq!(probs[4], 0.0);
    }

    #[test]
    fn test_melody_fit_rests_over_silence() {
        let model = MelodyFitModel::new(&vocab());
        let probs = model.predict(&context(&[0, 0], 8)).unwrap();
        let best = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(best, Some(0));
    }
}
