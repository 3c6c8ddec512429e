//! Storage operations for flashcards
//!
//! The whole deck lives in a single document:
//! ```text
//! {data_dir}/
//! └── flashcards.json   # { cards, topic?, lastUpdated }
//! ```
//! Every save rewrites the file wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::DeckSnapshot;

/// Directory name under the platform's local data dir
const APP_DIR_NAME: &str = "ai-flashcards";
const DECK_FILE_NAME: &str = "flashcards.json";

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Persistence port for the review session
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait DeckRepository: Send {
    fn load(&self) -> Result<Option<DeckSnapshot>>;
    fn save(&self, snapshot: &DeckSnapshot) -> Result<()>;
}

/// JSON file storage for the deck
pub struct FlashcardStorage {
    /// Base path (e.g., ~/.local/share/ai-flashcards)
    data_dir: PathBuf,
}

impl FlashcardStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Get the default per-user data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or(FlashcardStorageError::DataDirNotFound)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the deck file path
    pub fn deck_path(&self) -> PathBuf {
        self.data_dir.join(DECK_FILE_NAME)
    }

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl DeckRepository for FlashcardStorage {
    fn load(&self) -> Result<Option<DeckSnapshot>> {
        self.init()?;

        let deck_path = self.deck_path();
        if !deck_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&deck_path)?;
        let snapshot: DeckSnapshot = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded {} cards from {}",
            snapshot.cards.len(),
            deck_path.display()
        );
        Ok(Some(snapshot.normalized()))
    }

    fn save(&self, snapshot: &DeckSnapshot) -> Result<()> {
        self.init()?;

        let deck_path = self.deck_path();
        fs::write(&deck_path, serde_json::to_string_pretty(snapshot)?)?;
        log::debug!(
            "Saved {} cards to {}",
            snapshot.cards.len(),
            deck_path.display()
        );
        Ok(())
    }
}
