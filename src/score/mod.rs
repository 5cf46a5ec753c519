//! Symbolic score document
//!
//! A score is an ordered list of measures; each measure holds notes, rests and
//! harmony annotations at offsets relative to the start of the measure. All
//! times are exact quarter lengths.

mod document;
mod offset;

pub use document::{Element, Measure, Metadata, Score};
pub use offset::{tick_offset, QuarterLength, TICK_LENGTH};
