//! Chord model registry
//!
//! Maps model ids to shared model instances so the CLI can pick one by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::mock::{FixedDistributionModel, MelodyFitModel};
use super::model::{ChordModel, ChordModelInfo};
use crate::error::{HarmonizerError, Result};
use crate::vocab::Vocabulary;

/// Registry of available chord models
#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn ChordModel>>,
}

impl ModelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in weights-free models for `vocabulary`
    pub fn with_defaults(vocabulary: &Vocabulary) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MelodyFitModel::new(vocabulary)));
        registry.register(Arc::new(FixedDistributionModel::uniform(vocabulary.len())));
        registry
    }

    /// Register a model, replacing any model with the same id
    pub fn register(&mut self, model: Arc<dyn ChordModel>) {
        self.models.insert(model.id().to_string(), model);
    }

    /// Get a model by ID
    pub fn get(&self, id: &str) -> Result<Arc<dyn ChordModel>> {
        self.models
            .get(id)
            .cloned()
            .ok_or_else(|| HarmonizerError::UnknownModel {
                model: id.to_string(),
            })
    }

    /// List all registered model IDs, sorted
    pub fn list_models(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// List all model info
    pub fn list_model_info(&self) -> Vec<&ChordModelInfo> {
        self.models.values().map(|m| m.info()).collect()
    }
}
