//! Configuration loading and model target resolution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File written in single-model mode when no `--output` is given.
pub const SINGLE_MODEL_FILE: &str = "test_data.json";

/// Models processed when no model is named on the command line.
pub const DEFAULT_MODELS: &[&str] = &[
    "Qwen/Qwen3-0.6B",
    "Qwen/Qwen3-Embedding-0.6B",
    "Qwen/Qwen3-Next-80B-A3B-Instruct",
    "Qwen/Qwen3-VL-30B-A3B-Instruct",
    "Qwen/Qwen3-Reranker-0.6B",
];

/// Optional JSON configuration for batch generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Models to generate in batch mode, in order
    #[serde(default = "default_models")]
    pub models: Vec<ModelTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTarget {
    /// Model identifier, e.g. "Qwen/Qwen3-0.6B"
    pub name: String,
    /// Fixture path; derived from the model name when not set
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ModelTarget {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            output: None,
        }
    }

    /// Where this model's fixture goes. Relative `output` paths are taken
    /// relative to `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        match &self.output {
            Some(path) => output_dir.join(path),
            None => output_dir.join(fixture_file_name(&self.name)),
        }
    }
}

fn default_models() -> Vec<ModelTarget> {
    DEFAULT_MODELS.iter().map(|name| ModelTarget::new(name)).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: default_models(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        if config.models.is_empty() {
            anyhow::bail!("Config file {:?} lists no models", path);
        }

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

/// `Qwen/Qwen3-0.6B` -> `test_data_qwen3_0.6b.json`
pub fn fixture_file_name(model: &str) -> String {
    let base = model.rsplit('/').next().unwrap_or(model);
    format!("test_data_{}.json", base.to_lowercase().replace('-', "_"))
}

/// Directory holding a model's tokenizer files under `models_dir`.
pub fn model_dir(models_dir: &Path, model: &str) -> PathBuf {
    model
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(models_dir.to_path_buf(), |dir, part| dir.join(part))
}
