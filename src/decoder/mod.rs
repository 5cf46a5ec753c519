//! Chord decoding
//!
//! Turns a melody with its beat and key context into one chord-vocabulary
//! index per sixteenth-note tick.

mod context;
mod decode;
mod rhythm;

pub use context::{hot_index, one_hot, ContextWindow, EncodedContext, PaddedSong};
pub use decode::{argmax, count_changes, ChordDecoder, DEFAULT_SEGMENT_LENGTH};
pub use rhythm::{RhythmPolicy, DEFAULT_GAMMA};
