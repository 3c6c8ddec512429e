//! Application configuration
//!
//! Optional TOML file at `{config_dir}/flashdeck/config.toml`:
//! ```toml
//! data_dir = "/custom/path"
//!
//! [generation]
//! model = "claude-sonnet-4-5"
//! base_url = "https://api.anthropic.com"
//! max_tokens = 4096
//! card_count = 5
//! timeout_secs = 120
//! ```
//! The API key is never read from the file, only from `ANTHROPIC_API_KEY`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::{FlashcardStorage, FlashcardStorageError};

/// Environment variable holding the Anthropic API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const CONFIG_DIR_NAME: &str = "flashdeck";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "{} environment variable is required. Please set it before running the application.",
        API_KEY_ENV
    )]
    MissingApiKey,

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] FlashcardStorageError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the deck file lives (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub generation: GenerationSettings,
}

/// Settings for the card generation client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    /// Cards requested per generation
    pub card_count: usize,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            card_count: 5,
            timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. When falling back to the default
    /// location a missing file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.generation.card_count == 0 {
            return Err(ConfigError::Invalid {
                key: "generation.card_count",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Data directory from config, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FlashcardStorage::default_data_dir()?),
        }
    }
}

/// Read the API key from the environment
pub fn api_key_from_env() -> Result<String> {
    validate_api_key(std::env::var(API_KEY_ENV).ok())
}

fn validate_api_key(value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}
