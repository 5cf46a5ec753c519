//! From input files to harmonized scores on disk
//!
//! - `loader`: song loading and input discovery
//! - `export`: watermark and JSON output
//! - `batch`: the per-song and per-directory driver

mod batch;
mod export;
mod loader;

pub use batch::{BatchReport, Harmonized, Harmonizer, SongFailure};
pub use export::{output_path, write_score, Watermark};
pub use loader::{
    base_name, discover_songs, JsonSongLoader, SongLoader, JSON_EXTENSION, SCORE_EXTENSIONS,
};
