//! Flashcards and the review session for Flashdeck
//!
//! This module provides:
//! - Card and deck snapshot models
//! - Ease updates and weak-card selection
//! - JSON file persistence behind the `DeckRepository` port
//! - The review session state store

pub mod algorithm;
pub mod models;
pub mod session;
pub mod storage;

pub use models::*;
pub use session::{GenerationIntent, ReviewSession, SessionError};
pub use storage::{DeckRepository, FlashcardStorage, FlashcardStorageError};
