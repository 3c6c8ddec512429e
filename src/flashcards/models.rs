//! Data models for the flashcard system

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{DEFAULT_EASE, MIN_EASE};

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: u32,
    pub front: String,
    pub back: String,
    /// Ease factor, never below 1.3
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// Number of times the card has been rated
    #[serde(default)]
    pub reviews: u32,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl Flashcard {
    pub fn new(id: u32, front: String, back: String) -> Self {
        Self {
            id,
            front,
            back,
            ease: DEFAULT_EASE,
            reviews: 0,
        }
    }
}

/// User-supplied recall quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Completely forgot
    Again,
    /// Recalled with difficulty
    Hard,
    /// Recalled correctly
    Good,
    /// Very easy
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Map a 1-4 key to a rating
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Again),
            '2' => Some(Self::Hard),
            '3' => Some(Self::Good),
            '4' => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

/// The document written to disk: the whole deck plus its topic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl DeckSnapshot {
    pub fn new(cards: Vec<Flashcard>, topic: Option<String>) -> Self {
        Self {
            cards,
            topic,
            last_updated: Utc::now(),
        }
    }

    /// Repair values a hand-edited file may have broken
    ///
    /// Ease is clamped to the minimum. A card whose id was already used
    /// earlier in the file gets the next free id past the maximum, or is
    /// dropped when no id is left.
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::with_capacity(self.cards.len());
        let mut free_id = self
            .cards
            .iter()
            .map(|c| c.id)
            .max()
            .and_then(|max| max.checked_add(1));

        let cards = std::mem::take(&mut self.cards);
        for mut card in cards {
            if !card.ease.is_finite() || card.ease < MIN_EASE {
                card.ease = MIN_EASE;
            }

            if !seen.insert(card.id) {
                let Some(id) = free_id else {
                    log::warn!("Dropping card with duplicate id {}: no ids left", card.id);
                    continue;
                };
                log::warn!("Duplicate card id {}, renumbered to {}", card.id, id);
                card.id = id;
                seen.insert(id);
                free_id = id.checked_add(1);
            }

            self.cards.push(card);
        }
        self
    }
}
