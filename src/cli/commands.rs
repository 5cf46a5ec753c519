//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use tracing::{info, warn};

use super::HarmonizeArgs;
use crate::config::HarmonizerConfig;
use crate::error::Result;
use crate::neural::ModelRegistry;
use crate::pipeline::{BatchReport, Harmonizer, JsonSongLoader};
use crate::vocab::Vocabulary;

/// Defaults, then the config file, then the flags.
pub fn resolve_config(args: &HarmonizeArgs) -> Result<HarmonizerConfig> {
    let mut config = match &args.config {
        Some(path) => HarmonizerConfig::load(path)?,
        None => HarmonizerConfig::default(),
    };

    if let Some(input) = &args.input {
        config.inputs_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.outputs_path = output.clone();
    }
    if let Some(vocabulary) = &args.vocabulary {
        config.vocabulary_path = vocabulary.clone();
    }
    if let Some(segment_length) = args.segment_length {
        config.segment_length = segment_length;
    }
    if let Some(gamma) = args.gamma {
        config.rhythm_gamma = gamma;
    }
    config.chord_per_bar |= args.chord_per_bar;
    config.repeat_chord |= args.repeat_chord;
    config.parallel |= args.parallel;
    if args.no_watermark {
        config.watermark = false;
    }

    config.validate()?;
    Ok(config)
}

/// Load the vocabulary, warning about entries that can never be written.
fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let vocabulary = Vocabulary::load(path)?;
    for (index, error) in vocabulary.malformed_symbols() {
        warn!(index, error = %error, "vocabulary entry is not a readable chord");
    }
    Ok(vocabulary)
}

/// Harmonize the configured input directory.
pub fn harmonize(args: &HarmonizeArgs) -> Result<BatchReport> {
    let config = resolve_config(args)?;
    info!(
        input = %config.inputs_path.display(),
        output = %config.outputs_path.display(),
        "harmonizing"
    );

    let vocabulary = load_vocabulary(&config.vocabulary_path)?;
    let model = ModelRegistry::with_defaults(&vocabulary).get(&args.model)?;
    let harmonizer = Harmonizer::new(vocabulary, model, config)?;

    let report = harmonizer.run_batch(&JsonSongLoader)?;

    println!("Harmonized {} song(s)", report.outputs.len());
    for output in &report.outputs {
        println!("  {}", output.display());
    }
    if report.has_failures() {
        println!("Failed {} song(s)", report.failures.len());
        for failure in &report.failures {
            println!("  {} [{}]: {}", failure.filename, failure.code, failure.reason);
        }
    }

    Ok(report)
}

/// Print size, fingerprint and unreadable entries of a vocabulary.
pub fn show_vocabulary(path: &Path) -> Result<()> {
    let vocabulary = Vocabulary::load(path)?;
    let malformed = vocabulary.malformed_symbols();

    println!("Vocabulary: {}", path.display());
    println!("Symbols: {}", vocabulary.len());
    println!("Fingerprint: {}", vocabulary.fingerprint());
    if malformed.is_empty() {
        println!("All symbols are readable chords");
    } else {
        println!("Unreadable symbols: {}", malformed.len());
        for (index, error) in malformed {
            println!("  [{}] {}", index, error);
        }
    }

    Ok(())
}

/// List the models available for a vocabulary.
pub fn list_models(vocabulary_path: &Path) -> Result<()> {
    let vocabulary = Vocabulary::load(vocabulary_path)?;
    let registry = ModelRegistry::with_defaults(&vocabulary);

    for info in registry.list_model_info() {
        let weights = if info.requires_weights {
            " (requires weights)"
        } else {
            ""
        };
        println!("{} - {} v{}{}", info.id, info.name, info.version, weights);
        println!("    {}", info.description);
    }

    Ok(())
}
