//! Watermarking and writing harmonized scores

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{HarmonizerError, Result};
use crate::score::Score;

/// Provenance stamped into an exported score.
#[derive(Debug, Clone)]
pub struct Watermark<'a> {
    pub title: &'a str,
    pub composer: &'a str,
    pub vocabulary_fingerprint: &'a str,
    pub harmonized_at: DateTime<Utc>,
}

impl Watermark<'_> {
    /// Overwrite the score's metadata.
    pub fn apply(&self, score: &mut Score) {
        score.metadata.title = Some(self.title.to_string());
        score.metadata.composer = Some(self.composer.to_string());
        score.metadata.harmonized_at = Some(self.harmonized_at);
        score.metadata.vocabulary = Some(self.vocabulary_fingerprint.to_string());
    }
}

/// `<outputs>/<filename>.json`
pub fn output_path(outputs: &Path, filename: &str) -> PathBuf {
    outputs.join(format!("{filename}.json"))
}

/// Write `score` as pretty JSON, creating the output directory if needed.
pub fn write_score(score: &Score, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| HarmonizerError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(score)?;
    fs::write(path, content).map_err(|e| HarmonizerError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), measures = score.measures.len(), "wrote harmonized score");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{Element, Measure, QuarterLength};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn score() -> Score {
        Score::new(vec![Measure::new(1, QuarterLength::from_integer(0), QuarterLength::from_integer(4))
            .with_elements(vec![Element::harmony(QuarterLength::new(3, 2), "Am")])])
    }

    #[test]
    fn test_watermark_overwrites_metadata() {
        let mut score = score();
        score.metadata.title = Some("old".to_string());
        let stamped_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        Watermark {
            title: "tune",
            composer: "harmonized by harmonizer",
            vocabulary_fingerprint: "abc123",
            harmonized_at: stamped_at,
        }
        .apply(&mut score);

        assert_eq!(score.metadata.title.as_deref(), Some("tune"));
        assert_eq!(score.metadata.composer.as_deref(), Some("harmonized by harmonizer"));
        assert_eq!(score.metadata.harmonized_at, Some(stamped_at));
        assert_eq!(score.metadata.vocabulary.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_write_creates_directory_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = output_path(&dir.path().join("out"), "tune");
        assert!(path.ends_with("out/tune.json"));

        write_score(&score(), &path).unwrap();

        let written: Score = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, score());
        assert!(fs::read_to_string(&path).unwrap().contains("\"3/2\""));
    }
}
