//! Timeline reconciliation
//!
//! Turns a decoded chord stream into harmony annotations on a copy of the
//! source score:
//! - `events`: per-tick indices to offset-stamped change events
//! - `merge`: ordered insertion of those events into the score's measures

mod events;
mod merge;

pub use events::{extract_events, EventList, HarmonyEvent, RejectedSymbol};
pub use merge::merge_into_score;

use tracing::debug;

use crate::error::Result;
use crate::score::Score;
use crate::vocab::Vocabulary;

/// A harmonized copy of a score and what went into it.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub score: Score,
    pub events: Vec<HarmonyEvent>,
    pub rejected: Vec<RejectedSymbol>,
}

/// Write `chords` into a copy of `score` as harmony annotations.
///
/// The source score is left untouched. Any harmony it already carried is
/// replaced.
pub fn reconcile(
    score: &Score,
    chords: &[usize],
    beat: &[u8],
    vocabulary: &Vocabulary,
    repeat_chord: bool,
) -> Result<Reconciled> {
    let EventList { events, rejected } = extract_events(chords, beat, vocabulary, repeat_chord)?;
    let merged = merge_into_score(score, &events);

    debug!(
        events = events.len(),
        rejected = rejected.len(),
        measures = merged.measures.len(),
        "reconciled chords into score"
    );

    Ok(Reconciled {
        score: merged,
        events,
        rejected,
    })
}
