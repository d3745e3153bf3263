//! Configuration for the provider endpoint, credentials, and model ids.
//!
//! Loaded from `studyflow.toml`; every field has a default so the file is
//! optional. The API key itself never lives in the file: the config only
//! names the environment variable to read it from.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "studyflow.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudyflowConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// Completion provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible endpoint root.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Model ids per agent role.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Model backing syllabus extraction.
    #[serde(default = "default_model")]
    pub extraction: String,
    /// Model backing task ranking.
    #[serde(default = "default_model")]
    pub ranking: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            extraction: default_model(),
            ranking: default_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl StudyflowConfig {
    /// Load configuration from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&std::env::current_dir()?)
    }

    /// Load `studyflow.toml` from `dir`, falling back to defaults when
    /// the file is absent.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Resolve the API key from the configured environment variable,
    /// honoring a local `.env` file.
    pub fn api_key(&self) -> Result<String> {
        dotenvy::dotenv().ok();
        std::env::var(&self.provider.api_key_env)
            .with_context(|| format!("set {} in your environment", self.provider.api_key_env))
    }
}
