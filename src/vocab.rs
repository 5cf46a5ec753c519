//! Chord vocabulary
//!
//! The ordered table of harmonic symbols the model was trained against.
//! Index 0 is the "no chord" label. The table is loaded once and shared
//! read-only by every decoding run.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{HarmonizerError, Result};
use crate::harmony::{normalize_symbol, ChordSymbol, REST_SYMBOL};

/// Index of the "no chord" label
pub const NO_CHORD_INDEX: usize = 0;

/// Immutable index → symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    symbols: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from its ordered symbols.
    pub fn new(symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(HarmonizerError::EmptyVocabulary);
        }
        Ok(Self { symbols })
    }

    /// Load a vocabulary stored as a JSON array of strings.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HarmonizerError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let symbols: Vec<String> = serde_json::from_str(&content)?;
        Self::new(symbols)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Raw symbol at `index`. Out-of-range indices are an error, never clamped.
    pub fn symbol(&self, index: usize) -> Result<&str> {
        self.symbols
            .get(index)
            .map(String::as_str)
            .ok_or(HarmonizerError::VocabularyIndex {
                index,
                size: self.symbols.len(),
            })
    }

    /// Symbol at `index` with notation aliases rewritten.
    pub fn normalized_symbol(&self, index: usize) -> Result<String> {
        self.symbol(index).map(normalize_symbol)
    }

    /// SHA-256 over the ordered symbols, hex encoded.
    ///
    /// Two vocabularies with the same fingerprint map every index to the same
    /// symbol, so a model trained against one can be used with the other.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for symbol in &self.symbols {
            hasher.update(symbol.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Entries that are neither the rest symbol nor a parseable chord after
    /// normalization, with the parse failure.
    pub fn malformed_symbols(&self) -> Vec<(usize, HarmonizerError)> {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let symbol = normalize_symbol(raw);
                if symbol == REST_SYMBOL {
                    return None;
                }
                ChordSymbol::parse(&symbol).err().map(|e| (index, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vocabulary {
        Vocabulary::new(vec!["N.C.".into(), "C".into(), "G7".into(), "Bbpedal".into()]).unwrap()
    }

    #[test]
    fn test_lookup() {
        let vocab = sample();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.symbol(2).unwrap(), "G7");
        assert_eq!(vocab.normalized_symbol(0).unwrap(), "R");
        assert_eq!(vocab.normalized_symbol(3).unwrap(), "B-pedal");
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let err = sample().symbol(4).unwrap_err();
        assert!(matches!(
            err,
            HarmonizerError::VocabularyIndex { index: 4, size: 4 }
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            Vocabulary::new(Vec::new()),
            Err(HarmonizerError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chords.json");
        fs::write(&path, r#"["N.C.", "C", "Am"]"#).unwrap();

        let vocab = Vocabulary::load(&path).unwrap();
        assert_eq!(vocab.symbols(), &["N.C.", "C", "Am"]);
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let a = Vocabulary::new(vec!["R".into(), "C".into(), "G".into()]).unwrap();
        let b = Vocabulary::new(vec!["R".into(), "G".into(), "C".into()]).unwrap();
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_malformed_symbols() {
        let vocab = Vocabulary::new(vec!["N.C.".into(), "C".into(), "Xyz".into()]).unwrap();
        let malformed = vocab.malformed_symbols();
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].0, 2);
    }
}
