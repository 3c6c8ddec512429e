pub mod config;
pub mod flashcards;
pub mod generation;

pub use config::{AppConfig, ConfigError, GenerationSettings};
pub use flashcards::{
    DeckRepository, DeckSnapshot, Flashcard, FlashcardStorage, GenerationIntent, Rating,
    ReviewSession,
};
pub use generation::{AnthropicGenerator, CardGenerator, GenerationError};
