//! Harmonizer - Melody Harmonization Engine
//!
//! Predicts one chord label per sixteenth note of a melody and writes the
//! result back into the melody's score as harmony annotations.
//!
//! # Architecture
//!
//! The work happens in two stages:
//! 1. Decoding: a chord model is queried tick by tick over a sliding context
//!    window; a sampling bias steers how often the chord may change
//! 2. Reconciliation: the per-tick chord stream becomes offset-stamped
//!    harmony events merged into the score's measures, leaving notes and
//!    rests in their original order
//!
//! Song loading, export and batch running live in [`pipeline`].

pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod harmony;
pub mod neural;
pub mod pipeline;
pub mod reconcile;
pub mod score;
pub mod song;
pub mod vocab;

pub use config::HarmonizerConfig;
pub use error::{HarmonizerError, Result};
