//! Chord model trait and core types
//!
//! Defines the interface every chord classifier must implement. The decoder
//! only ever talks to a `dyn ChordModel`, so learned models, heuristics and
//! test stubs are interchangeable.

use serde::{Deserialize, Serialize};

use crate::decoder::EncodedContext;
use crate::error::Result;

/// Information about a chord model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordModelInfo {
    /// Model identifier (e.g., "melody-fit")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Model version
    pub version: String,

    /// Description of what the model does
    pub description: String,

    /// Whether the model needs a trained weights artifact
    pub requires_weights: bool,
}

impl ChordModelInfo {
    pub fn new(id: &str, name: &str, version: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            requires_weights: false,
        }
    }

    pub fn with_weights(mut self) -> Self {
        self.requires_weights = true;
        self
    }
}

/// Trait that all chord models must implement
///
/// Models are queried once per tick with batch size one and must be safe to
/// share between threads decoding different songs.
pub trait ChordModel: Send + Sync {
    /// Get model information
    fn info(&self) -> &ChordModelInfo;

    /// Probability of every vocabulary index at the context's decode position.
    ///
    /// The returned vector must have one entry per vocabulary symbol, each
    /// finite and non-negative, summing to 1.
    fn predict(&self, context: &EncodedContext) -> Result<Vec<f32>>;

    /// Get model ID (convenience method)
    fn id(&self) -> &str {
        &self.info().id
    }
}

/// Normalise raw scores into a probability distribution.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![1.0 / scores.len().max(1) as f32; scores.len()];
    }

    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
