//! Exact quarter-length time values

use num_rational::Ratio;
use serde::{Deserialize, Deserializer, Serializer};

/// Time position or duration in quarter notes.
pub type QuarterLength = Ratio<i64>;

/// Duration of one decoding tick (a sixteenth note) in quarter lengths.
pub const TICK_LENGTH: QuarterLength = Ratio::new_raw(1, 4);

/// Absolute offset of tick `tick` from the start of the song.
pub fn tick_offset(tick: usize) -> QuarterLength {
    TICK_LENGTH * QuarterLength::from_integer(tick as i64)
}

/// Serde adapter: written as `"3/2"` style strings, read from either such a
/// string or a plain JSON number.
pub(crate) mod serde_quarter_length {
    use super::*;

    pub fn serialize<S: Serializer>(value: &QuarterLength, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<QuarterLength, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => QuarterLength::approximate_float(value)
                .ok_or_else(|| serde::de::Error::custom(format!("unrepresentable offset {value}"))),
            Repr::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid offset '{text}'"))),
        }
    }
}
