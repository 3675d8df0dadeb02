//! YAML deployment configuration for the refind pipeline.
//!
//! One file configures every stage: taxonomy tables, embedding generation,
//! candidate retrieval, and match thresholds. All sections are optional
//! and fall back to their stage defaults.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "campus deployment"
//!
//! embed:
//!   mode: "api"
//!   model_name: "text-embedding-004"
//!   api_url: "https://embeddings.internal/v1/embed"
//!   timeout_secs: 30
//!
//! retriever:
//!   top_k: 10
//!
//! matcher:
//!   score_threshold: 0.70
//!   override_threshold: 0.85
//!   max_distance_km: 2.0
//!
//! taxonomy:
//!   object_keywords: ["laptop", "macbook", "phone"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use classify::TaxonomyConfig;
use embed::EmbedConfig;
use index::RetrieverConfig;
use matcher::MatchConfig;

/// Errors that can occur when loading the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefindConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub taxonomy: TaxonomyConfig,

    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(default)]
    pub retriever: RetrieverConfig,

    #[serde(default)]
    pub matcher: MatchConfig,
}

impl RefindConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: RefindConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and every stage section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        self.taxonomy
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.embed
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.retriever
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        Ok(())
    }
}

impl Default for RefindConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            taxonomy: TaxonomyConfig::default(),
            embed: EmbedConfig::default(),
            retriever: RetrieverConfig::default(),
            matcher: MatchConfig::default(),
        }
    }
}
