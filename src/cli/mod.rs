//! CLI Module
//!
//! Command-line interface for the harmonizer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Model used when `--model` is not given
pub const DEFAULT_MODEL: &str = "melody-fit";

/// Melody harmonizer - predicts a chord per sixteenth note and writes it
/// back into the score
#[derive(Parser, Debug)]
#[command(name = "harmonizer-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Harmonize every song in the input directory
    #[command(name = "harmonize")]
    Harmonize(HarmonizeArgs),

    /// Inspect a chord vocabulary file
    #[command(name = "vocabulary")]
    Vocabulary {
        /// Path to the vocabulary JSON array
        path: PathBuf,
    },

    /// List the available chord models
    #[command(name = "models")]
    Models {
        /// Vocabulary the models are built against
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },
}

/// Flags for `harmonize`; anything left unset falls back to the config file,
/// then to the defaults.
#[derive(clap::Args, Debug)]
pub struct HarmonizeArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of songs to harmonize
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for harmonized scores
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chord vocabulary JSON array
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Chord model id
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Context ticks on each side of the decoded tick
    #[arg(long)]
    pub segment_length: Option<usize>,

    /// Repetition pull in (0, 1]; higher means fewer chord changes
    #[arg(long)]
    pub gamma: Option<f32>,

    /// At most one chord change per bar
    #[arg(long)]
    pub chord_per_bar: bool,

    /// Write the current chord again at every bar start
    #[arg(long)]
    pub repeat_chord: bool,

    /// Leave score metadata untouched
    #[arg(long)]
    pub no_watermark: bool,

    /// Harmonize songs on a thread pool
    #[arg(long)]
    pub parallel: bool,
}

impl Default for HarmonizeArgs {
    /// Same values as a bare `harmonize` on the command line.
    fn default() -> Self {
        Self {
            config: None,
            input: None,
            output: None,
            vocabulary: None,
            model: DEFAULT_MODEL.to_string(),
            segment_length: None,
            gamma: None,
            chord_per_bar: false,
            repeat_chord: false,
            no_watermark: false,
            parallel: false,
        }
    }
}
