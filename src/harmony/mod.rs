//! Chord symbols
//!
//! Parsing and alias normalization for the harmonic-symbol strings stored in
//! the chord vocabulary. Symbols follow the usual lead-sheet notation with `-`
//! as the canonical flat sign (`B-7`, `E-maj7`, `C/E`).

mod kind;
mod symbol;

pub use kind::ChordKind;
pub use symbol::{normalize_symbol, pitch_class_name, ChordSymbol, NO_CHORD_MARKER, REST_SYMBOL};
