//! Error handling for the harmonizer
//!
//! Every error carries enough context to tell the user which song or artifact
//! failed and what to do about it.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for harmonizer operations
pub type Result<T> = std::result::Result<T, HarmonizerError>;

/// Main error type for harmonizer operations
#[derive(Error, Debug)]
pub enum HarmonizerError {
    // Input validation
    #[error("Sequence length mismatch: melody={melody}, beat={beat}, key={key}")]
    LengthMismatch {
        melody: usize,
        beat: usize,
        key: usize,
    },

    #[error("{sequence} value {value} at tick {tick} is outside 0..{domain}")]
    ValueOutOfDomain {
        sequence: &'static str,
        tick: usize,
        value: u8,
        domain: usize,
    },

    #[error("Decoded {chords} chords for a beat sequence of {beat} ticks")]
    ChordBeatMismatch { chords: usize, beat: usize },

    // Vocabulary errors
    #[error("Chord index {index} is outside the vocabulary (size {size})")]
    VocabularyIndex { index: usize, size: usize },

    #[error("Vocabulary is empty")]
    EmptyVocabulary,

    #[error("Invalid chord symbol '{symbol}': {reason}")]
    InvalidChordSymbol { symbol: String, reason: String },

    // Model errors
    #[error("Model '{model}' returned {actual} probabilities, expected {expected}")]
    ModelOutput {
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("Model '{model}' failed: {reason}")]
    ModelFailure { model: String, reason: String },

    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    #[error("Sampling bias failed: {reason}")]
    BiasFailure { reason: String },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // File errors
    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output {path} was already written by {first}")]
    DuplicateOutput { path: PathBuf, first: PathBuf },

    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HarmonizerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            HarmonizerError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            HarmonizerError::ValueOutOfDomain { .. } => "VALUE_OUT_OF_DOMAIN",
            HarmonizerError::ChordBeatMismatch { .. } => "CHORD_BEAT_MISMATCH",
            HarmonizerError::VocabularyIndex { .. } => "VOCABULARY_INDEX",
            HarmonizerError::EmptyVocabulary => "EMPTY_VOCABULARY",
            HarmonizerError::InvalidChordSymbol { .. } => "INVALID_CHORD_SYMBOL",
            HarmonizerError::ModelOutput { .. } => "MODEL_OUTPUT",
            HarmonizerError::ModelFailure { .. } => "MODEL_FAILURE",
            HarmonizerError::UnknownModel { .. } => "UNKNOWN_MODEL",
            HarmonizerError::BiasFailure { .. } => "BIAS_FAILURE",
            HarmonizerError::InvalidConfig { .. } => "INVALID_CONFIG",
            HarmonizerError::FileRead { .. } => "FILE_READ",
            HarmonizerError::FileWrite { .. } => "FILE_WRITE",
            HarmonizerError::DuplicateOutput { .. } => "DUPLICATE_OUTPUT",
            HarmonizerError::InputDirNotFound { .. } => "INPUT_DIR_NOT_FOUND",
            HarmonizerError::Io(_) => "IO_ERROR",
            HarmonizerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether this error only voids the current song.
    ///
    /// Batch runs record song-fatal errors and move on; anything else stops
    /// the batch because every later song would fail the same way.
    pub fn is_song_fatal(&self) -> bool {
        !matches!(
            self,
            HarmonizerError::EmptyVocabulary
                | HarmonizerError::UnknownModel { .. }
                | HarmonizerError::InvalidConfig { .. }
                | HarmonizerError::InputDirNotFound { .. }
        )
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "Re-extract the song; melody, beat and key must align tick for tick",
            Self::ValueOutOfDomain { .. } => "Check the loader: melody < 128, beat < 5, key < 16",
            Self::VocabularyIndex { .. } | Self::ModelOutput { .. } => {
                "Make sure the model was trained against this chord vocabulary"
            }
            Self::EmptyVocabulary => "Point --vocabulary at a trained chord table",
            Self::UnknownModel { .. } => "Run with --help to list the available models",
            Self::InvalidConfig { .. } => "Fix the configuration value and try again",
            Self::InputDirNotFound { .. } => "Create the input directory or pass --input",
            Self::DuplicateOutput { .. } => "Rename one of the inputs; both map to the same output file",
            _ => "Check the error details and try again",
        }
    }
}
