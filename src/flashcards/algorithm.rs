//! Ease update and weak-card selection
//!
//! Each rating nudges the card's ease factor:
//! - Again: -0.20
//! - Hard:  -0.15
//! - Good:   0.00
//! - Easy:  +0.15
//!
//! The ease never drops below 1.3. Lower ease means the card is harder for
//! the learner, which is what weak-card selection keys on.

use std::cmp::Ordering;

use super::models::{Flashcard, Rating};

/// Minimum ease factor allowed
pub const MIN_EASE: f64 = 1.3;

/// Ease assigned to freshly generated cards
pub const DEFAULT_EASE: f64 = 2.5;

/// Default number of weak cards fed into a remedial prompt
pub const DEFAULT_WEAK_COUNT: usize = 5;

/// Ease differences at or below this are treated as equal
const EASE_TIE_TOLERANCE: f64 = 0.1;

/// Ease delta applied for a rating
pub fn ease_delta(rating: Rating) -> f64 {
    match rating {
        Rating::Again => -0.2,
        Rating::Hard => -0.15,
        Rating::Good => 0.0,
        Rating::Easy => 0.15,
    }
}

/// Apply a rating to a card, updating ease and review count
pub fn apply_rating(card: &mut Flashcard, rating: Rating) {
    card.ease = (card.ease + ease_delta(rating)).max(MIN_EASE);
    card.reviews += 1;
}

/// Next id for a new card: one past the current maximum, or 1 for an empty set
///
/// Returns `None` once the maximum id is `u32::MAX`.
pub fn next_id(cards: &[Flashcard]) -> Option<u32> {
    match cards.iter().map(|c| c.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Whether `count` more cards can be numbered after `cards`
pub fn has_room_for(cards: &[Flashcard], count: usize) -> bool {
    let Some(start) = next_id(cards) else {
        return false;
    };
    let Ok(count) = u32::try_from(count) else {
        return false;
    };
    count == 0 || start.checked_add(count - 1).is_some()
}

/// Pick the cards the learner struggles with most
///
/// Only reviewed cards qualify. Cards are ordered by ease (lowest first);
/// eases within 0.1 of each other count as equal and the card with more
/// reviews wins, since its ease is backed by more data.
pub fn weak_cards(cards: &[Flashcard], count: usize) -> Vec<Flashcard> {
    let mut reviewed: Vec<&Flashcard> = Vec::new();

    // The tolerance makes the comparator non-transitive, which slice::sort_by
    // is allowed to reject, so insert one card at a time instead.
    for card in cards.iter().filter(|c| c.reviews > 0) {
        let pos = reviewed
            .iter()
            .position(|placed| compare_weakness(card, placed) == Ordering::Less)
            .unwrap_or(reviewed.len());
        reviewed.insert(pos, card);
    }

    reviewed.into_iter().take(count).cloned().collect()
}

fn compare_weakness(a: &Flashcard, b: &Flashcard) -> Ordering {
    let ease_diff = a.ease - b.ease;
    if ease_diff.abs() > EASE_TIE_TOLERANCE {
        return ease_diff.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
    }
    b.reviews.cmp(&a.reviews)
}
