//! Chord model interfaces and implementations
//!
//! This module provides:
//! - `ChordModel` trait for every chord classifier
//! - `SamplingBias` trait and the gamma-sampling implementation
//! - Weights-free models for testing and demos
//! - Model registry

mod bias;
mod mock;
mod model;
mod registry;

pub use bias::{GammaBias, SamplingBias, FORCE, SUPPRESS};
pub use mock::{key_tonic, FixedDistributionModel, MelodyFitModel};
pub use model::{softmax, ChordModel, ChordModelInfo};
pub use registry::ModelRegistry;
