use std::path::PathBuf;

use anyhow::{Context, Result};

use flashdeck_lib::config::AppConfig;
use flashdeck_lib::flashcards::{FlashcardStorage, ReviewSession};
use flashdeck_lib::generation::AnthropicGenerator;

/// Shared application state for CLI commands and the TUI
pub struct App {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub session: ReviewSession,
}

impl App {
    /// Open the deck in the configured data directory
    pub fn new(config: AppConfig, data_dir: PathBuf) -> Result<Self> {
        let storage = FlashcardStorage::new(data_dir.clone());
        storage
            .init()
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let session = ReviewSession::load(Box::new(storage));

        Ok(Self {
            config,
            data_dir,
            session,
        })
    }

    /// Build the generation client
    ///
    /// Fails when `ANTHROPIC_API_KEY` is not set.
    pub fn generator(&self) -> Result<AnthropicGenerator> {
        AnthropicGenerator::from_env(&self.config.generation)
            .context("Card generation is not configured")
    }

    /// Cards requested per generation
    pub fn card_count(&self) -> usize {
        self.config.generation.card_count
    }

    pub fn deck_path(&self) -> PathBuf {
        FlashcardStorage::new(self.data_dir.clone()).deck_path()
    }
}
