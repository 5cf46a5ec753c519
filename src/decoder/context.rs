//! Context windows around a decode position
//!
//! Melody, beat and key are seen on both sides of the current tick; chords
//! only on the left, because chords to the right have not been decoded yet.
//! The right-hand windows are reversed so that position `t` is the last row,
//! matching the layout the model was trained on.

use std::ops::Range;

use crate::error::Result;
use crate::song::{validate_sequences, BEAT_CLASSES, KEY_CLASSES, MELODY_CLASSES};

/// Expand each value into an indicator row of width `classes`.
pub fn one_hot<I>(values: I, classes: usize) -> Vec<Vec<f32>>
where
    I: IntoIterator<Item = usize>,
{
    values
        .into_iter()
        .map(|value| {
            let mut row = vec![0.0; classes];
            if let Some(slot) = row.get_mut(value) {
                *slot = 1.0;
            }
            row
        })
        .collect()
}

/// Melody, beat and key padded with `segment_length` zero ticks on each side.
#[derive(Debug, Clone)]
pub struct PaddedSong {
    melody: Vec<u8>,
    beat: Vec<u8>,
    key: Vec<u8>,
    segment_length: usize,
}

impl PaddedSong {
    /// Validate and pad. Rejects misaligned or out-of-domain input before any
    /// window is built.
    pub fn new(melody: &[u8], beat: &[u8], key: &[u8], segment_length: usize) -> Result<Self> {
        validate_sequences(melody, beat, key)?;

        let pad = |values: &[u8]| {
            let mut padded = Vec::with_capacity(values.len() + 2 * segment_length);
            padded.resize(segment_length, 0);
            padded.extend_from_slice(values);
            padded.resize(values.len() + 2 * segment_length, 0);
            padded
        };

        Ok(Self {
            melody: pad(melody),
            beat: pad(beat),
            key: pad(key),
            segment_length,
        })
    }

    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    /// Number of unpadded ticks
    pub fn song_len(&self) -> usize {
        self.melody.len() - 2 * self.segment_length
    }

    /// Padded positions that get a chord, in decode order.
    pub fn positions(&self) -> Range<usize> {
        self.segment_length..self.melody.len() - self.segment_length
    }

    pub fn melody_at(&self, position: usize) -> u8 {
        self.melody[position]
    }

    pub fn beat_at(&self, position: usize) -> u8 {
        self.beat[position]
    }

    /// Windows around padded position `position`. `history` holds every chord
    /// decoded so far, starting with `segment_length` padding zeros.
    pub fn window(&self, position: usize, history: &[usize]) -> ContextWindow {
        let len = self.segment_length;
        let left = position - len..position;
        let right = position..position + len;
        let reversed =
            |values: &[u8]| -> Vec<u8> { values[right.clone()].iter().rev().copied().collect() };

        ContextWindow {
            melody_left: self.melody[left.clone()].to_vec(),
            melody_right: reversed(&self.melody),
            beat_left: self.beat[left.clone()].to_vec(),
            beat_right: reversed(&self.beat),
            key_left: self.key[left].to_vec(),
            key_right: reversed(&self.key),
            chord_left: history[history.len() - len..].to_vec(),
        }
    }
}

/// Raw categorical windows for one decode position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub melody_left: Vec<u8>,
    pub melody_right: Vec<u8>,
    pub beat_left: Vec<u8>,
    pub beat_right: Vec<u8>,
    pub key_left: Vec<u8>,
    pub key_right: Vec<u8>,
    pub chord_left: Vec<usize>,
}

impl ContextWindow {
    /// One-hot encode every window; beat and key rows are joined per side
    /// into condition rows (beat first).
    pub fn encode(&self, vocab_size: usize) -> EncodedContext {
        let widen = |values: &[u8]| values.iter().map(|&v| usize::from(v)).collect::<Vec<_>>();
        let condition = |beat: &[u8], key: &[u8]| -> Vec<Vec<f32>> {
            one_hot(widen(beat), BEAT_CLASSES)
                .into_iter()
                .zip(one_hot(widen(key), KEY_CLASSES))
                .map(|(mut row, key_row)| {
                    row.extend(key_row);
                    row
                })
                .collect()
        };

        EncodedContext {
            melody_left: one_hot(widen(&self.melody_left), MELODY_CLASSES),
            melody_right: one_hot(widen(&self.melody_right), MELODY_CLASSES),
            condition_left: condition(&self.beat_left, &self.key_left),
            condition_right: condition(&self.beat_right, &self.key_right),
            chord_left: one_hot(self.chord_left.iter().copied(), vocab_size),
        }
    }
}

/// Model input: one-hot rows, `segment_length` rows per tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedContext {
    pub melody_left: Vec<Vec<f32>>,
    pub melody_right: Vec<Vec<f32>>,
    pub condition_left: Vec<Vec<f32>>,
    pub condition_right: Vec<Vec<f32>>,
    pub chord_left: Vec<Vec<f32>>,
}

impl EncodedContext {
    /// Melody pitch at the decode position (last row of the reversed right
    /// window).
    pub fn current_melody(&self) -> Option<usize> {
        self.melody_right.last().and_then(|row| hot_index(row))
    }

    /// Key class at the decode position.
    pub fn current_key(&self) -> Option<usize> {
        self.condition_right
            .last()
            .and_then(|row| hot_index(&row[BEAT_CLASSES..]))
    }

    /// Most recently decoded chord.
    pub fn previous_chord(&self) -> Option<usize> {
        self.chord_left.last().and_then(|row| hot_index(row))
    }
}

/// Position of the first 1.0 in an indicator row.
pub fn hot_index(row: &[f32]) -> Option<usize> {
    row.iter().position(|&v| v == 1.0)
}
