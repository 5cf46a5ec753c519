//! Song loading and input discovery

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{HarmonizerError, Result};
use crate::song::Song;

/// File extensions of notated scores
pub const SCORE_EXTENSIONS: &[&str] = &[".musicxml", ".xml", ".mxl"];

/// Extension read by [`JsonSongLoader`]
pub const JSON_EXTENSION: &str = ".json";

/// Turns an input file into the sequences and score the decoder needs.
///
/// Score parsing lives outside this crate; implementations for notation
/// formats plug in here.
pub trait SongLoader: Send + Sync {
    /// Extensions this loader accepts, with the leading dot.
    fn extensions(&self) -> &[&str] {
        SCORE_EXTENSIONS
    }

    fn load(&self, path: &Path) -> Result<Song>;
}

/// Reads songs already extracted to JSON: `{melody, beat, key, score}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSongLoader;

impl SongLoader for JsonSongLoader {
    fn extensions(&self) -> &[&str] {
        &[JSON_EXTENSION]
    }

    fn load(&self, path: &Path) -> Result<Song> {
        let content = fs::read_to_string(path).map_err(|e| HarmonizerError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut song: Song = serde_json::from_str(&content)?;
        if song.filename.is_empty() {
            song.filename = base_name(path);
        }
        song.validate()?;
        Ok(song)
    }
}

/// File name without directory or extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every file under `dir` whose extension is in `extensions`, sorted by path.
pub fn discover_songs(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(HarmonizerError::InputDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut songs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), extensions))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    songs.sort();
    Ok(songs)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
    extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(&ext))
}
