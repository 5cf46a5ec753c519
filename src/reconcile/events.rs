//! Decoded chords to harmony events
//!
//! The decoder produces a chord for every tick; a score only wants a symbol
//! where the harmony changes. This walks the ticks and keeps the changes.

use tracing::warn;

use crate::error::{HarmonizerError, Result};
use crate::harmony::{ChordSymbol, REST_SYMBOL};
use crate::score::{tick_offset, QuarterLength};
use crate::song::BAR_START;
use crate::vocab::Vocabulary;

/// A chord symbol at an absolute offset from the start of the song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarmonyEvent {
    pub symbol: String,
    pub offset: QuarterLength,
}

impl HarmonyEvent {
    pub fn new(symbol: impl Into<String>, offset: QuarterLength) -> Self {
        Self {
            symbol: symbol.into(),
            offset,
        }
    }
}

/// A decoded symbol that could not be written as a chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSymbol {
    pub tick: usize,
    pub symbol: String,
    pub reason: String,
}

/// Events in offset order plus the symbols that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventList {
    pub events: Vec<HarmonyEvent>,
    pub rejected: Vec<RejectedSymbol>,
}

/// Collapse the per-tick chord stream into harmony events.
///
/// An event is emitted when the symbol is not the rest symbol and it differs
/// from the previous tick's symbol. With `repeat_chord` set, an unchanged
/// chord is written again on the first tick of each bar. Symbols that do not
/// parse are reported and skipped; they still count as the previous symbol.
pub fn extract_events(
    chords: &[usize],
    beat: &[u8],
    vocabulary: &Vocabulary,
    repeat_chord: bool,
) -> Result<EventList> {
    if chords.len() != beat.len() {
        return Err(HarmonizerError::ChordBeatMismatch {
            chords: chords.len(),
            beat: beat.len(),
        });
    }

    let mut list = EventList::default();
    let mut previous: Option<String> = None;

    for (tick, &index) in chords.iter().enumerate() {
        let symbol = vocabulary.normalized_symbol(index)?;

        let changed = previous.as_deref() != Some(symbol.as_str());
        let bar_restart =
            repeat_chord && tick > 0 && beat[tick] == BAR_START && beat[tick - 1] != BAR_START;

        if symbol != REST_SYMBOL && (changed || bar_restart) {
            match ChordSymbol::parse(&symbol) {
                Ok(_) => list
                    .events
                    .push(HarmonyEvent::new(symbol.clone(), tick_offset(tick))),
                Err(e) => {
                    warn!(tick, symbol = %symbol, error = %e, "dropping unreadable chord symbol");
                    list.rejected.push(RejectedSymbol {
                        tick,
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        previous = Some(symbol);
    }

    Ok(list)
}
