//! Chord kinds and their interval structure

use serde::{Deserialize, Serialize};

/// Chord quality, identified by the suffix written after the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordKind {
    Major,
    Minor,
    Diminished,
    Augmented,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    MinorMajorSeventh,
    HalfDiminished,
    DiminishedSeventh,
    Sixth,
    MinorSixth,
    Ninth,
    MajorNinth,
    MinorNinth,
    AddNine,
    Eleventh,
    Thirteenth,
    SuspendedSecond,
    SuspendedFourth,
    SeventhSuspendedFourth,
    Power,
    Pedal,
}

/// Accepted suffix spellings. Several spellings may map to one kind.
const SUFFIXES: &[(&str, ChordKind)] = &[
    ("m7b5", ChordKind::HalfDiminished),
    ("mM7", ChordKind::MinorMajorSeventh),
    ("maj9", ChordKind::MajorNinth),
    ("maj7", ChordKind::MajorSeventh),
    ("min7", ChordKind::MinorSeventh),
    ("min", ChordKind::Minor),
    ("m9", ChordKind::MinorNinth),
    ("m7", ChordKind::MinorSeventh),
    ("m6", ChordKind::MinorSixth),
    ("m", ChordKind::Minor),
    ("M7", ChordKind::MajorSeventh),
    ("M9", ChordKind::MajorNinth),
    ("dim7", ChordKind::DiminishedSeventh),
    ("dim", ChordKind::Diminished),
    ("o7", ChordKind::DiminishedSeventh),
    ("o", ChordKind::Diminished),
    ("aug", ChordKind::Augmented),
    ("+", ChordKind::Augmented),
    ("7sus4", ChordKind::SeventhSuspendedFourth),
    ("7sus", ChordKind::SeventhSuspendedFourth),
    ("sus2", ChordKind::SuspendedSecond),
    ("sus4", ChordKind::SuspendedFourth),
    ("sus", ChordKind::SuspendedFourth),
    ("add9", ChordKind::AddNine),
    ("dom7", ChordKind::DominantSeventh),
    ("13", ChordKind::Thirteenth),
    ("11", ChordKind::Eleventh),
    ("9", ChordKind::Ninth),
    ("7", ChordKind::DominantSeventh),
    ("6", ChordKind::Sixth),
    ("ø7", ChordKind::HalfDiminished),
    ("ø", ChordKind::HalfDiminished),
    ("power", ChordKind::Power),
    ("pedal", ChordKind::Pedal),
];

impl ChordKind {
    /// Look up a kind by its full suffix. The empty suffix is a major triad.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        if suffix.is_empty() || suffix == "M" || suffix == "maj" {
            return Some(ChordKind::Major);
        }
        SUFFIXES
            .iter()
            .find(|(spelling, _)| *spelling == suffix)
            .map(|(_, kind)| *kind)
    }

    /// Canonical suffix used when printing a symbol.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordKind::Major => "",
            ChordKind::Minor => "m",
            ChordKind::Diminished => "dim",
            ChordKind::Augmented => "aug",
            ChordKind::DominantSeventh => "7",
            ChordKind::MajorSeventh => "maj7",
            ChordKind::MinorSeventh => "m7",
            ChordKind::MinorMajorSeventh => "mM7",
            ChordKind::HalfDiminished => "m7b5",
            ChordKind::DiminishedSeventh => "dim7",
            ChordKind::Sixth => "6",
            ChordKind::MinorSixth => "m6",
            ChordKind::Ninth => "9",
            ChordKind::MajorNinth => "maj9",
            ChordKind::MinorNinth => "m9",
            ChordKind::AddNine => "add9",
            ChordKind::Eleventh => "11",
            ChordKind::Thirteenth => "13",
            ChordKind::SuspendedSecond => "sus2",
            ChordKind::SuspendedFourth => "sus4",
            ChordKind::SeventhSuspendedFourth => "7sus4",
            ChordKind::Power => "power",
            ChordKind::Pedal => "pedal",
        }
    }

    /// Semitone intervals above the root, root first.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordKind::Major => &[0, 4, 7],
            ChordKind::Minor => &[0, 3, 7],
            ChordKind::Diminished => &[0, 3, 6],
            ChordKind::Augmented => &[0, 4, 8],
            ChordKind::DominantSeventh => &[0, 4, 7, 10],
            ChordKind::MajorSeventh => &[0, 4, 7, 11],
            ChordKind::MinorSeventh => &[0, 3, 7, 10],
            ChordKind::MinorMajorSeventh => &[0, 3, 7, 11],
            ChordKind::HalfDiminished => &[0, 3, 6, 10],
            ChordKind::DiminishedSeventh => &[0, 3, 6, 9],
            ChordKind::Sixth => &[0, 4, 7, 9],
            ChordKind::MinorSixth => &[0, 3, 7, 9],
            ChordKind::Ninth => &[0, 4, 7, 10, 2],
            ChordKind::MajorNinth => &[0, 4, 7, 11, 2],
            ChordKind::MinorNinth => &[0, 3, 7, 10, 2],
            ChordKind::AddNine => &[0, 4, 7, 2],
            ChordKind::Eleventh => &[0, 4, 7, 10, 2, 5],
            ChordKind::Thirteenth => &[0, 4, 7, 10, 2, 9],
            ChordKind::SuspendedSecond => &[0, 2, 7],
            ChordKind::SuspendedFourth => &[0, 5, 7],
            ChordKind::SeventhSuspendedFourth => &[0, 5, 7, 10],
            ChordKind::Power => &[0, 7],
            ChordKind::Pedal => &[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_suffix_round_trips() {
        for (_, kind) in SUFFIXES {
            assert_eq!(ChordKind::from_suffix(kind.suffix()), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_suffix() {
        assert_eq!(ChordKind::from_suffix("blah"), None);
        assert_eq!(ChordKind::from_suffix(""), Some(ChordKind::Major));
    }
}
