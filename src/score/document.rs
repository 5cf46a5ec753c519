//! Score, measure and element types

use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use super::offset::{serde_quarter_length, QuarterLength};

/// One item inside a measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Note {
        #[serde(with = "serde_quarter_length")]
        offset: QuarterLength,
        #[serde(with = "serde_quarter_length")]
        duration: QuarterLength,
        /// MIDI pitch number
        pitch: u8,
    },
    Rest {
        #[serde(with = "serde_quarter_length")]
        offset: QuarterLength,
        #[serde(with = "serde_quarter_length")]
        duration: QuarterLength,
    },
    /// Chord symbol annotation
    Harmony {
        #[serde(with = "serde_quarter_length")]
        offset: QuarterLength,
        symbol: String,
    },
}

impl Element {
    pub fn note(offset: QuarterLength, duration: QuarterLength, pitch: u8) -> Self {
        Element::Note {
            offset,
            duration,
            pitch,
        }
    }

    pub fn rest(offset: QuarterLength, duration: QuarterLength) -> Self {
        Element::Rest { offset, duration }
    }

    pub fn harmony(offset: QuarterLength, symbol: impl Into<String>) -> Self {
        Element::Harmony {
            offset,
            symbol: symbol.into(),
        }
    }

    /// Offset relative to the containing measure
    pub fn offset(&self) -> QuarterLength {
        match self {
            Element::Note { offset, .. }
            | Element::Rest { offset, .. }
            | Element::Harmony { offset, .. } => *offset,
        }
    }

    pub fn is_harmony(&self) -> bool {
        matches!(self, Element::Harmony { .. })
    }

    pub fn harmony_symbol(&self) -> Option<&str> {
        match self {
            Element::Harmony { symbol, .. } => Some(symbol),
            _ => None,
        }
    }
}

/// A bar of music.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub number: u32,
    /// Absolute offset of the bar from the start of the score
    #[serde(with = "serde_quarter_length")]
    pub offset: QuarterLength,
    /// Bar length in quarter notes (4 for 4/4, 3/2 for 3/8, ...)
    #[serde(with = "serde_quarter_length")]
    pub length: QuarterLength,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Measure {
    pub fn new(number: u32, offset: QuarterLength, length: QuarterLength) -> Self {
        Self {
            number,
            offset,
            length,
            elements: Vec::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Absolute offset where the next bar begins
    pub fn end(&self) -> QuarterLength {
        self.offset + self.length
    }

    /// A copy of this bar with its harmony annotations removed.
    pub fn without_harmony(&self) -> Self {
        Self {
            number: self.number,
            offset: self.offset,
            length: self.length,
            elements: self
                .elements
                .iter()
                .filter(|e| !e.is_harmony())
                .cloned()
                .collect(),
        }
    }
}

/// Descriptive metadata stamped on exported scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmonized_at: Option<DateTime<Utc>>,
    /// Fingerprint of the chord vocabulary used for harmonization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
}

/// A single-staff score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl Score {
    pub fn new(measures: Vec<Measure>) -> Self {
        Self {
            metadata: Metadata::default(),
            measures,
        }
    }

    /// Every harmony annotation as (absolute offset, symbol), in score order.
    pub fn harmonies(&self) -> Vec<(QuarterLength, &str)> {
        self.measures
            .iter()
            .flat_map(|m| {
                m.elements.iter().filter_map(move |e| {
                    e.harmony_symbol().map(|symbol| (m.offset + e.offset(), symbol))
                })
            })
            .collect()
    }

    /// Total length in quarter notes
    pub fn duration(&self) -> QuarterLength {
        self.measures
            .last()
            .map(Measure::end)
            .unwrap_or_else(QuarterLength::zero)
    }
}
