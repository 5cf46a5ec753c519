//! Chord symbol parsing and alias normalization

use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::ChordKind;
use crate::error::{HarmonizerError, Result};

/// Symbol used for "no chord" after normalization.
pub const REST_SYMBOL: &str = "R";

/// Raw "no chord" spelling found in trained vocabularies.
pub const NO_CHORD_MARKER: &str = "N.C.";

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "E-", "E", "F", "F#", "G", "A-", "A", "B-", "B",
];

/// Rewrite known notation aliases into the canonical spelling.
///
/// `N.C.` becomes the rest symbol and a `b` flat written directly before
/// `pedal` becomes `-`. Applying this twice gives the same result as once.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim()
        .replace(NO_CHORD_MARKER, REST_SYMBOL)
        .replace("bpedal", "-pedal")
}

/// Name of a pitch class (0 = C), flats spelled with `-`.
pub fn pitch_class_name(pitch_class: u8) -> &'static str {
    PITCH_CLASS_NAMES[usize::from(pitch_class % 12)]
}

/// A parsed chord symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordSymbol {
    /// Root pitch class, 0 = C
    pub root: u8,
    pub kind: ChordKind,
    /// Bass pitch class for slash chords
    pub bass: Option<u8>,
}

impl ChordSymbol {
    /// Parse a normalized symbol such as `C`, `B-7`, `F#m7b5` or `C/E`.
    pub fn parse(symbol: &str) -> Result<Self> {
        let invalid = |reason: &str| HarmonizerError::InvalidChordSymbol {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        };

        if symbol.is_empty() {
            return Err(invalid("empty symbol"));
        }
        if symbol == REST_SYMBOL {
            return Err(invalid("rest is not a chord"));
        }

        let (body, bass) = match symbol.rfind('/') {
            Some(pos) => {
                let (bass, rest) = parse_pitch(&symbol[pos + 1..])
                    .ok_or_else(|| invalid("unreadable bass note"))?;
                if !rest.is_empty() {
                    return Err(invalid("trailing text after bass note"));
                }
                (&symbol[..pos], Some(bass))
            }
            None => (symbol, None),
        };

        let (root, suffix) = parse_pitch(body).ok_or_else(|| invalid("missing root A-G"))?;
        let kind = ChordKind::from_suffix(suffix)
            .ok_or_else(|| invalid(&format!("unknown chord kind '{}'", suffix)))?;

        Ok(Self { root, kind, bass })
    }

    /// Pitch classes sounding in this chord, root first, bass appended when it
    /// is not already a chord tone.
    pub fn pitch_classes(&self) -> Vec<u8> {
        let mut classes: Vec<u8> = self
            .kind
            .intervals()
            .iter()
            .map(|interval| (self.root + interval) % 12)
            .collect();
        if let Some(bass) = self.bass {
            if !classes.contains(&bass) {
                classes.push(bass);
            }
        }
        classes
    }

    /// True if the MIDI pitch belongs to the chord.
    pub fn contains_pitch(&self, midi_pitch: u8) -> bool {
        self.pitch_classes().contains(&(midi_pitch % 12))
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", pitch_class_name(self.root), self.kind.suffix())?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", pitch_class_name(bass))?;
        }
        Ok(())
    }
}

/// Read a note name with accidentals from the front of `text`.
fn parse_pitch(text: &str) -> Option<(u8, &str)> {
    let mut chars = text.char_indices();
    let (_, letter) = chars.next()?;
    let natural: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut shift = 0i32;
    let mut end = letter.len_utf8();
    for (idx, c) in chars {
        match c {
            '#' => shift += 1,
            '-' | 'b' => shift -= 1,
            _ => {
                end = idx;
                break;
            }
        }
        end = idx + c.len_utf8();
    }

    let pitch_class = (natural + shift).rem_euclid(12) as u8;
    Some((pitch_class, &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("C", 0, ChordKind::Major ; "plain major")]
    #[test_case("Am", 9, ChordKind::Minor ; "minor")]
    #[test_case("B-7", 10, ChordKind::DominantSeventh ; "flat with dash")]
    #[test_case("Bb7", 10, ChordKind::DominantSeventh ; "flat with b")]
    #[test_case("F#m7b5", 6, ChordKind::HalfDiminished ; "half diminished")]
    #[test_case("E-maj7", 3, ChordKind::MajorSeventh ; "major seventh")]
    #[test_case("Gsus4", 7, ChordKind::SuspendedFourth ; "suspended")]
    #[test_case("B-pedal", 10, ChordKind::Pedal ; "pedal")]
    #[test_case("Cb", 11, ChordKind::Major ; "c flat wraps")]
    fn test_parse_root_and_kind(symbol: &str, root: u8, kind: ChordKind) {
        let parsed = ChordSymbol::parse(symbol).unwrap();
        assert_eq!(parsed.root, root);
        assert_eq!(parsed.kind, kind);
        assert_eq!(parsed.bass, None);
    }

    #[test]
    fn test_parse_slash_chord() {
        let parsed = ChordSymbol::parse("C/E").unwrap();
        assert_eq!(parsed.bass, Some(4));
        assert_eq!(parsed.pitch_classes(), vec![0, 4, 7]);

        let parsed = ChordSymbol::parse("C/B-").unwrap();
        assert_eq!(parsed.pitch_classes(), vec![0, 4, 7, 10]);
        assert_eq!(parsed.to_string(), "C/B-");
    }

    #[test_case("" ; "empty")]
    #[test_case("R" ; "rest")]
    #[test_case("H7" ; "bad root")]
    #[test_case("Cblah" ; "bad kind")]
    #[test_case("C/X" ; "bad bass")]
    #[test_case("N.C." ; "unnormalized no chord")]
    fn test_parse_rejects(symbol: &str) {
        let err = ChordSymbol::parse(symbol).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CHORD_SYMBOL");
    }

    #[test_case("N.C.", "R")]
    #[test_case("Bbpedal", "B-pedal")]
    #[test_case("Ebpedal", "E-pedal")]
    #[test_case("Cpedal", "Cpedal")]
    #[test_case(" G7 ", "G7")]
    #[test_case("Am", "Am")]
    fn test_normalize(raw: &str, expected: &str) {
        assert_eq!(normalize_symbol(raw), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["N.C.", "Bbpedal", "Bbbpedal", "C", "F#m7", "R", " N.C. "] {
            let once = normalize_symbol(raw);
            assert_eq!(normalize_symbol(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_contains_pitch() {
        let c = ChordSymbol::parse("C").unwrap();
        assert!(c.contains_pitch(60));
        assert!(c.contains_pitch(67));
        assert!(!c.contains_pitch(62));
    }
}
