//! Autoregressive chord decoding
//!
//! One chord per tick, left to right. Each step sees the melody, beat and key
//! on both sides of the tick but only the chords already decided, so a song
//! must be decoded strictly in order.

use tracing::debug;

use super::context::PaddedSong;
use super::rhythm::RhythmPolicy;
use crate::error::{HarmonizerError, Result};
use crate::neural::{ChordModel, SamplingBias, SUPPRESS};
use crate::song::{BAR_START, REST_PITCH};
use crate::vocab::NO_CHORD_INDEX;

/// Default context width on each side, in ticks
pub const DEFAULT_SEGMENT_LENGTH: usize = 32;

/// Allowed distance between a model distribution's total and 1
const PROBABILITY_TOLERANCE: f32 = 1e-3;

/// Drives model, bias and rhythm policy across one song.
///
/// The decoder borrows its collaborators and holds no per-song state, so one
/// instance can decode many songs, including from several threads.
pub struct ChordDecoder<'a> {
    model: &'a dyn ChordModel,
    bias: &'a dyn SamplingBias,
    vocab_size: usize,
    segment_length: usize,
    policy: RhythmPolicy,
}

impl<'a> ChordDecoder<'a> {
    pub fn new(
        model: &'a dyn ChordModel,
        bias: &'a dyn SamplingBias,
        vocab_size: usize,
        segment_length: usize,
        policy: RhythmPolicy,
    ) -> Result<Self> {
        if segment_length == 0 {
            return Err(HarmonizerError::InvalidConfig {
                reason: "segment length must be at least one tick".to_string(),
            });
        }
        if vocab_size == 0 {
            return Err(HarmonizerError::EmptyVocabulary);
        }
        Ok(Self {
            model,
            bias,
            vocab_size,
            segment_length,
            policy,
        })
    }

    pub fn policy(&self) -> RhythmPolicy {
        self.policy
    }

    /// Decode one vocabulary index per tick of the song.
    pub fn decode(&self, melody: &[u8], beat: &[u8], key: &[u8]) -> Result<Vec<usize>> {
        let song = PaddedSong::new(melody, beat, key, self.segment_length)?;

        let mut history = vec![NO_CHORD_INDEX; self.segment_length];
        history.reserve(song.song_len());

        for position in song.positions() {
            let chord = self.step(&song, position, &history)?;
            history.push(chord);
        }

        let chords = history.split_off(self.segment_length);
        debug!(
            model = self.model.id(),
            ticks = chords.len(),
            changes = count_changes(&chords),
            "decoded song"
        );
        Ok(chords)
    }

    fn step(&self, song: &PaddedSong, position: usize, history: &[usize]) -> Result<usize> {
        let context = song.window(position, history).encode(self.vocab_size);
        let mut probs = self.model.predict(&context)?;
        self.check_model_output(&probs)?;

        // A note starting a bar gets a chord unless the model insists on none.
        if song.melody_at(position) != REST_PITCH && song.beat_at(position) == BAR_START {
            probs = self.biased(&probs, NO_CHORD_INDEX, SUPPRESS)?;
        }

        let previous = history[history.len() - 1];
        let weight = self.policy.repetition_weight(song, position);
        probs = self.biased(&probs, previous, weight)?;

        let chord = argmax(&probs);
        if chord >= self.vocab_size {
            return Err(HarmonizerError::VocabularyIndex {
                index: chord,
                size: self.vocab_size,
            });
        }
        Ok(chord)
    }

    fn biased(&self, probs: &[f32], target: usize, weight: f32) -> Result<Vec<f32>> {
        let adjusted = self.bias.adjust(probs, &[target], weight)?;
        if adjusted.len() != probs.len() || adjusted.iter().any(|p| !p.is_finite()) {
            return Err(HarmonizerError::BiasFailure {
                reason: format!(
                    "adjusted distribution of {} values is malformed",
                    adjusted.len()
                ),
            });
        }
        Ok(adjusted)
    }

    fn check_model_output(&self, probs: &[f32]) -> Result<()> {
        if probs.len() != self.vocab_size {
            return Err(HarmonizerError::ModelOutput {
                model: self.model.id().to_string(),
                expected: self.vocab_size,
                actual: probs.len(),
            });
        }
        if let Some(bad) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(HarmonizerError::ModelFailure {
                model: self.model.id().to_string(),
                reason: format!("invalid probability {bad}"),
            });
        }
        let total: f32 = probs.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(HarmonizerError::ModelFailure {
                model: self.model.id().to_string(),
                reason: format!("probabilities sum to {total}, not 1"),
            });
        }
        Ok(())
    }
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0
}

/// Number of ticks whose chord differs from the tick before.
pub fn count_changes(chords: &[usize]) -> usize {
    chords.windows(2).filter(|pair| pair[0] != pair[1]).count()
}
