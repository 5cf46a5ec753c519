//! Batch harmonization driver

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};

use super::export::{output_path, write_score, Watermark};
use super::loader::{base_name, discover_songs, SongLoader};
use crate::config::HarmonizerConfig;
use crate::decoder::ChordDecoder;
use crate::error::{HarmonizerError, Result};
use crate::neural::{ChordModel, GammaBias, SamplingBias};
use crate::reconcile::{reconcile, HarmonyEvent, RejectedSymbol};
use crate::score::Score;
use crate::song::Song;
use crate::vocab::Vocabulary;

/// Everything produced for one song.
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub filename: String,
    pub chords: Vec<usize>,
    pub events: Vec<HarmonyEvent>,
    pub rejected: Vec<RejectedSymbol>,
    pub score: Score,
}

/// A song the batch could not harmonize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFailure {
    pub filename: String,
    pub code: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Written files, in input order
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<SongFailure>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Vocabulary, model, bias and settings shared by every song in a run.
pub struct Harmonizer {
    vocabulary: Vocabulary,
    model: Arc<dyn ChordModel>,
    bias: Arc<dyn SamplingBias>,
    config: HarmonizerConfig,
}

impl Harmonizer {
    pub fn new(
        vocabulary: Vocabulary,
        model: Arc<dyn ChordModel>,
        config: HarmonizerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            vocabulary,
            model,
            bias: Arc::new(GammaBias),
            config,
        })
    }

    /// Replace the default gamma-sampling bias.
    pub fn with_bias(mut self, bias: Arc<dyn SamplingBias>) -> Self {
        self.bias = bias;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &HarmonizerConfig {
        &self.config
    }

    /// Decode, reconcile and (optionally) watermark one song.
    ///
    /// The result is named after the base name of `song.filename`, so a
    /// loader may hand back a full path.
    pub fn harmonize_song(&self, song: &Song) -> Result<Harmonized> {
        let decoder = ChordDecoder::new(
            self.model.as_ref(),
            self.bias.as_ref(),
            self.vocabulary.len(),
            self.config.segment_length,
            self.config.rhythm_policy()?,
        )?;

        let chords = decoder.decode(&song.melody, &song.beat, &song.key)?;
        let reconciled = reconcile(
            &song.score,
            &chords,
            &song.beat,
            &self.vocabulary,
            self.config.repeat_chord,
        )?;

        let filename = base_name(Path::new(&song.filename));
        let mut score = reconciled.score;
        if self.config.watermark {
            Watermark {
                title: &filename,
                composer: &self.config.composer_credit,
                vocabulary_fingerprint: &self.vocabulary.fingerprint(),
                harmonized_at: Utc::now(),
            }
            .apply(&mut score);
        }

        Ok(Harmonized {
            filename,
            chords,
            events: reconciled.events,
            rejected: reconciled.rejected,
            score,
        })
    }

    /// Load, harmonize and write one input file; returns the output path.
    pub fn harmonize_file(&self, loader: &dyn SongLoader, path: &Path) -> Result<PathBuf> {
        let (output, harmonized) = self.prepare(loader, path)?;
        write_score(&harmonized.score, &output)?;
        Ok(output)
    }

    fn prepare(&self, loader: &dyn SongLoader, path: &Path) -> Result<(PathBuf, Harmonized)> {
        let song = loader.load(path)?;
        let harmonized = self.harmonize_song(&song)?;
        Ok((self.output_for(path, &harmonized.filename), harmonized))
    }

    /// Output location for `input`: its directory relative to `inputs_path`,
    /// mirrored under `outputs_path`.
    pub fn output_for(&self, input: &Path, name: &str) -> PathBuf {
        let subdir = input
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.config.inputs_path).ok())
            .filter(|dir| !dir.as_os_str().is_empty());
        match subdir {
            Some(dir) => output_path(&self.config.outputs_path.join(dir), name),
            None => output_path(&self.config.outputs_path, name),
        }
    }

    /// Harmonize every input the loader accepts under `inputs_path`.
    ///
    /// A song that fails is recorded in the report and the batch goes on,
    /// including a song whose output file another input already claimed.
    /// Errors that would fail every song (see
    /// [`crate::error::HarmonizerError::is_song_fatal`]) abort the run.
    pub fn run_batch(&self, loader: &dyn SongLoader) -> Result<BatchReport> {
        let inputs = discover_songs(&self.config.inputs_path, loader.extensions())?;
        info!(
            songs = inputs.len(),
            model = self.model.id(),
            parallel = self.config.parallel,
            "starting batch"
        );

        let prepared: Vec<Result<(PathBuf, Harmonized)>> = if self.config.parallel {
            inputs
                .par_iter()
                .map(|path| self.prepare(loader, path))
                .collect()
        } else {
            inputs
                .iter()
                .map(|path| self.prepare(loader, path))
                .collect()
        };

        // Writes stay sequential and in input order so collisions resolve
        // the same way with or without the thread pool.
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        let mut report = BatchReport::default();
        for (path, result) in inputs.iter().zip(prepared) {
            let written = result.and_then(|(output, harmonized)| {
                if let Some(first) = claimed.get(&output) {
                    return Err(HarmonizerError::DuplicateOutput {
                        path: output,
                        first: first.to_path_buf(),
                    });
                }
                write_score(&harmonized.score, &output)?;
                claimed.insert(output.clone(), path);
                Ok(output)
            });

            match written {
                Ok(output) => report.outputs.push(output),
                Err(e) if e.is_song_fatal() => {
                    warn!(path = %path.display(), code = e.error_code(), error = %e, "song failed");
                    report.failures.push(SongFailure {
                        filename: base_name(path),
                        code: e.error_code(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            written = report.outputs.len(),
            failed = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for Harmonizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harmonizer")
            .field("vocabulary", &self.vocabulary.len())
            .field("model", &self.model.id())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::FixedDistributionModel;
    use crate::score::{Element, Measure, Metadata, QuarterLength};
    use pretty_assertions::assert_eq;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec!["R".into(), "C".into(), "G".into()]).unwrap()
    }

    fn song() -> Song {
        Song {
            melody: vec![60, 60, 60, 60],
            beat: vec![4, 0, 0, 0],
            key: vec![8, 8, 8, 8],
            score: Score::new(vec![Measure::new(
                1,
                QuarterLength::from_integer(0),
                QuarterLength::from_integer(1),
            )
            .with_elements(vec![Element::note(
                QuarterLength::from_integer(0),
                QuarterLength::from_integer(1),
                60,
            )])]),
            filename: "held".to_string(),
        }
    }

    fn harmonizer(config: HarmonizerConfig) -> Harmonizer {
        let model = Arc::new(FixedDistributionModel::new(vec![0.1, 0.7, 0.2]));
        Harmonizer::new(vocabulary(), model, config).unwrap()
    }

    #[test]
    fn test_harmonize_song_with_watermark() {
        let h = harmonizer(HarmonizerConfig::default());
        let out = h.harmonize_song(&song()).unwrap();

        assert_eq!(out.chords, vec![1, 1, 1, 1]);
        assert_eq!(out.events, vec![HarmonyEvent::new("C", QuarterLength::from_integer(0))]);
        assert_eq!(out.score.metadata.title.as_deref(), Some("held"));
        assert_eq!(
            out.score.metadata.vocabulary.as_deref(),
            Some(vocabulary().fingerprint().as_str())
        );
        assert!(out.score.metadata.harmonized_at.is_some());
    }

    #[test]
    fn test_harmonize_song_without_watermark() {
        let h = harmonizer(HarmonizerConfig {
            watermark: false,
            ..Default::default()
        });
        let out = h.harmonize_song(&song()).unwrap();
        assert_eq!(out.score.metadata, Metadata::default());
    }

    #[test]
    fn test_path_bearing_filename_reduced_to_base_name() {
        let h = harmonizer(HarmonizerConfig::default());
        let mut tune = song();
        tune.filename = "/library/inputs/tune.mxl".to_string();

        let out = h.harmonize_song(&tune).unwrap();
        assert_eq!(out.filename, "tune");
        assert_eq!(out.score.metadata.title.as_deref(), Some("tune"));
    }

    #[test]
    fn test_output_mirrors_input_subdirectory() {
        let h = harmonizer(HarmonizerConfig {
            inputs_path: PathBuf::from("/data/in"),
            outputs_path: PathBuf::from("/data/out"),
            ..Default::default()
        });
        assert_eq!(
            h.output_for(Path::new("/data/in/tune.json"), "tune"),
            PathBuf::from("/data/out/tune.json")
        );
        assert_eq!(
            h.output_for(Path::new("/data/in/folk/reels/tune.json"), "tune"),
            PathBuf::from("/data/out/folk/reels/tune.json")
        );
        // Inputs outside the input tree land at the top of the output tree.
        assert_eq!(
            h.output_for(Path::new("/elsewhere/tune.json"), "tune"),
            PathBuf::from("/data/out/tune.json")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let model = Arc::new(FixedDistributionModel::new(vec![0.1, 0.7, 0.2]));
        let config = HarmonizerConfig {
            rhythm_gamma: 2.0,
            ..Default::default()
        };
        assert!(Harmonizer::new(vocabulary(), model, config).is_err());
    }
}
