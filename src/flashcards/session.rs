//! Review session state
//!
//! `ReviewSession` owns the in-memory deck plus the UI-facing review state
//! (current card, flip state, reviewed count, generation status). Every
//! action that changes cards writes the full deck through the injected
//! [`DeckRepository`]. Storage failures are logged and otherwise ignored,
//! so the session keeps working from memory.
//!
//! Generation is split in two so the network call can run elsewhere:
//! [`ReviewSession::begin_generation`] shapes the request and raises the
//! in-flight flag, [`ReviewSession::finish_generation`] merges the outcome.

use thiserror::Error;

use super::algorithm::{apply_rating, has_room_for, next_id};
use super::models::{DeckSnapshot, Flashcard, Rating};
use super::storage::DeckRepository;
use crate::generation::{
    CardGenerator, GeneratedBatch, GeneratedCard, GenerationError, GenerationMode,
    GenerationRequest,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A generation is already in progress")]
    AlreadyGenerating,

    #[error("Topic must not be empty")]
    EmptyTopic,

    #[error("Either existing cards or a topic must be provided")]
    NothingToExtend,

    #[error("Card count must be at least 1")]
    InvalidCount,

    #[error("No card ids left: the deck already uses the largest id")]
    IdsExhausted,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// What the user asked to generate
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationIntent {
    /// Start a new deck on this topic
    Topic(String),
    /// Add cards to the current deck
    More,
}

pub struct ReviewSession {
    repository: Box<dyn DeckRepository>,
    cards: Vec<Flashcard>,
    topic: Option<String>,
    current_index: usize,
    is_flipped: bool,
    reviewed_count: u32,
    is_generating: bool,
    generation_error: Option<String>,
    last_reasoning: Option<String>,
}

impl ReviewSession {
    /// Start a session from whatever the repository holds
    pub fn load(repository: Box<dyn DeckRepository>) -> Self {
        let snapshot = match repository.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to load flashcards: {}", e);
                None
            }
        };

        let (cards, topic) = snapshot
            .map(|s| (s.cards, s.topic))
            .unwrap_or_default();
        log::info!("Session started with {} cards", cards.len());

        Self {
            repository,
            cards,
            topic,
            current_index: 0,
            is_flipped: false,
            reviewed_count: 0,
            is_generating: false,
            generation_error: None,
            last_reasoning: None,
        }
    }

    // ==================== Selectors ====================

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn reviewed_count(&self) -> u32 {
        self.reviewed_count
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }

    pub fn last_reasoning(&self) -> Option<&str> {
        self.last_reasoning.as_deref()
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.cards.len()
    }

    /// "Card X of Y | Reviewed: N"
    pub fn progress_label(&self) -> String {
        format!(
            "Card {} of {} | Reviewed: {}",
            self.current_index + 1,
            self.cards.len(),
            self.reviewed_count
        )
    }

    // ==================== Review Actions ====================

    pub fn flip(&mut self) {
        self.is_flipped = !self.is_flipped;
    }

    pub fn next_card(&mut self) {
        if self.can_go_next() {
            self.current_index += 1;
            self.is_flipped = false;
        }
    }

    pub fn prev_card(&mut self) {
        if self.can_go_prev() {
            self.current_index -= 1;
            self.is_flipped = false;
        }
    }

    /// Rate the current card and move on, wrapping to the first card
    pub fn rate(&mut self, rating: Rating) {
        let total = self.cards.len();
        let Some(card) = self.cards.get_mut(self.current_index) else {
            return;
        };

        apply_rating(card, rating);
        log::debug!(
            "Rated card {} as {:?}: ease {:.2}, reviews {}",
            card.id,
            rating,
            card.ease,
            card.reviews
        );

        self.reviewed_count += 1;
        self.current_index = if self.current_index + 1 < total {
            self.current_index + 1
        } else {
            0
        };
        self.is_flipped = false;
        self.persist();
    }

    /// Drop every card and the topic, back to the first-run state
    pub fn clear(&mut self) {
        self.cards.clear();
        self.topic = None;
        self.current_index = 0;
        self.is_flipped = false;
        self.reviewed_count = 0;
        self.generation_error = None;
        self.last_reasoning = None;
        self.persist();
        log::info!("Cleared all cards");
    }

    // ==================== Generation ====================

    /// Shape a generation request and mark generation as in flight
    pub fn begin_generation(
        &mut self,
        intent: GenerationIntent,
        count: usize,
    ) -> Result<GenerationRequest> {
        if self.is_generating {
            return Err(SessionError::AlreadyGenerating);
        }
        if count == 0 {
            return Err(SessionError::InvalidCount);
        }

        let mode = match intent {
            GenerationIntent::Topic(topic) => {
                if topic.trim().is_empty() {
                    return Err(SessionError::EmptyTopic);
                }
                GenerationMode::for_topic(&topic)
            }
            GenerationIntent::More => {
                let mode = GenerationMode::extending(&self.cards)
                    .ok_or(SessionError::NothingToExtend)?;
                if !has_room_for(&self.cards, count) {
                    return Err(SessionError::IdsExhausted);
                }
                mode
            }
        };

        self.is_generating = true;
        self.generation_error = None;
        Ok(GenerationRequest::new(mode, count))
    }

    /// Merge a generation outcome into the session
    ///
    /// On failure the deck and topic stay as they were and the message is
    /// kept for display. Returns the number of cards added.
    pub fn finish_generation(
        &mut self,
        request: &GenerationRequest,
        outcome: std::result::Result<GeneratedBatch, GenerationError>,
    ) -> Result<usize> {
        self.is_generating = false;

        let batch = match outcome {
            Ok(batch) => batch,
            Err(e) => {
                log::error!("Failed to generate flashcards: {}", e);
                self.generation_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let added = match &request.mode {
            GenerationMode::Topic { topic } => {
                self.cards = number_cards(1, batch.cards);
                self.topic = Some(topic.clone());
                self.current_index = 0;
                self.is_flipped = false;
                self.reviewed_count = 0;
                self.cards.len()
            }
            GenerationMode::Varied { .. } | GenerationMode::Remedial { .. } => {
                let Some(start) = next_id(&self.cards) else {
                    let e = SessionError::IdsExhausted;
                    log::error!("Failed to add generated cards: {}", e);
                    self.generation_error = Some(e.to_string());
                    return Err(e);
                };
                let numbered = number_cards(start, batch.cards);
                let added = numbered.len();
                self.cards.extend(numbered);
                added
            }
        };

        self.last_reasoning = Some(batch.reasoning);
        self.generation_error = None;
        self.persist();
        log::info!(
            "Added {} generated cards ({} total)",
            added,
            self.cards.len()
        );
        Ok(added)
    }

    /// Forget an in-flight generation whose task was aborted
    pub fn cancel_generation(&mut self) {
        if self.is_generating {
            self.is_generating = false;
            log::info!("Generation cancelled");
        }
    }

    /// Run a full generation round trip against `generator`
    pub async fn generate(
        &mut self,
        generator: &dyn CardGenerator,
        intent: GenerationIntent,
        count: usize,
    ) -> Result<usize> {
        let request = self.begin_generation(intent, count)?;
        let outcome = generator.generate(&request).await;
        self.finish_generation(&request, outcome)
    }

    fn persist(&self) {
        let snapshot = DeckSnapshot::new(self.cards.clone(), self.topic.clone());
        if let Err(e) = self.repository.save(&snapshot) {
            log::error!("Failed to save flashcards: {}", e);
        }
    }
}

/// Number cards from `start`; cards past `u32::MAX` are dropped
fn number_cards(start: u32, generated: Vec<GeneratedCard>) -> Vec<Flashcard> {
    generated
        .into_iter()
        .zip(start..=u32::MAX)
        .map(|(card, id)| Flashcard::new(id, card.front, card.back))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::storage::{FlashcardStorageError, Result as StorageResult};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Repository that keeps the last saved snapshot in memory
    #[derive(Clone, Default)]
    struct MemoryRepository {
        saved: Arc<Mutex<Option<DeckSnapshot>>>,
        saves: Arc<Mutex<usize>>,
        fail_writes: bool,
    }

    impl MemoryRepository {
        fn with_cards(cards: Vec<Flashcard>, topic: Option<&str>) -> Self {
            let repo = Self::default();
            *repo.saved.lock().unwrap() = Some(DeckSnapshot::new(cards, topic.map(String::from)));
            repo
        }

        fn saved(&self) -> Option<DeckSnapshot> {
            self.saved.lock().unwrap().clone()
        }

        fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    impl DeckRepository for MemoryRepository {
        fn load(&self) -> StorageResult<Option<DeckSnapshot>> {
            Ok(self.saved())
        }

        fn save(&self, snapshot: &DeckSnapshot) -> StorageResult<()> {
            if self.fail_writes {
                return Err(FlashcardStorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            *self.saved.lock().unwrap() = Some(snapshot.clone());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct BrokenRepository;

    impl DeckRepository for BrokenRepository {
        fn load(&self) -> StorageResult<Option<DeckSnapshot>> {
            Err(FlashcardStorageError::DataDirNotFound)
        }

        fn save(&self, _snapshot: &DeckSnapshot) -> StorageResult<()> {
            Err(FlashcardStorageError::DataDirNotFound)
        }
    }

    /// Generator returning a canned outcome and recording the request
    struct ScriptedGenerator {
        outcome: Mutex<Option<std::result::Result<GeneratedBatch, GenerationError>>>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(outcome: std::result::Result<GeneratedBatch, GenerationError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CardGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> std::result::Result<GeneratedBatch, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("generator called more than once")
        }
    }

    fn card(id: u32, ease: f64, reviews: u32) -> Flashcard {
        Flashcard {
            id,
            front: format!("front {}", id),
            back: format!("back {}", id),
            ease,
            reviews,
        }
    }

    fn batch(fronts: &[&str]) -> GeneratedBatch {
        GeneratedBatch {
            cards: fronts
                .iter()
                .map(|f| GeneratedCard {
                    front: f.to_string(),
                    back: format!("{} answer", f),
                })
                .collect(),
            reasoning: "Build from basics.".to_string(),
        }
    }

    fn session_with(cards: Vec<Flashcard>) -> (ReviewSession, MemoryRepository) {
        let repo = MemoryRepository::with_cards(cards, Some("Rust"));
        let session = ReviewSession::load(Box::new(repo.clone()));
        (session, repo)
    }

    #[test]
    fn test_load_existing_deck() {
        let (session, _repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);

        assert!(session.has_cards());
        assert_eq!(session.total_cards(), 2);
        assert_eq!(session.topic(), Some("Rust"));
        assert_eq!(session.current_card().unwrap().id, 1);
        assert_eq!(session.progress_label(), "Card 1 of 2 | Reviewed: 0");
    }

    #[test]
    fn test_load_failure_starts_empty() {
        let session = ReviewSession::load(Box::new(BrokenRepository));

        assert!(!session.has_cards());
        assert!(session.current_card().is_none());
        assert_eq!(session.topic(), None);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0), card(3, 2.5, 0)]);

        session.prev_card();
        assert_eq!(session.current_index(), 0);

        for _ in 0..10 {
            session.next_card();
            assert!(session.current_index() < session.total_cards());
        }
        assert_eq!(session.current_index(), 2);
        assert!(!session.can_go_next());

        for _ in 0..10 {
            session.prev_card();
        }
        assert_eq!(session.current_index(), 0);
        assert!(!session.can_go_prev());
    }

    #[test]
    fn test_navigation_on_empty_deck() {
        let (mut session, _repo) = session_with(Vec::new());

        session.next_card();
        session.prev_card();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_navigation_resets_flip() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);

        session.flip();
        assert!(session.is_flipped());
        session.next_card();
        assert!(!session.is_flipped());

        session.flip();
        session.prev_card();
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_rate_updates_card_and_advances() {
        let (mut session, repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);

        session.flip();
        session.rate(Rating::Again);

        let rated = &session.cards()[0];
        assert!((rated.ease - 2.3).abs() < 1e-9);
        assert_eq!(rated.reviews, 1);
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_flipped());
        assert_eq!(session.reviewed_count(), 1);

        let saved = repo.saved().unwrap();
        assert_eq!(saved.cards[0].reviews, 1);
        assert_eq!(saved.topic.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_rate_wraps_to_first_card() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);

        session.next_card();
        session.rate(Rating::Easy);

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.reviewed_count(), 1);
    }

    #[test]
    fn test_rate_empty_deck_is_noop() {
        let (mut session, repo) = session_with(Vec::new());

        session.rate(Rating::Good);

        assert_eq!(session.reviewed_count(), 0);
        assert_eq!(repo.save_count(), 0);
    }

    #[test]
    fn test_rate_survives_storage_failure() {
        let repo = MemoryRepository {
            fail_writes: true,
            ..MemoryRepository::with_cards(vec![card(1, 1.4, 2)], None)
        };
        let mut session = ReviewSession::load(Box::new(repo));

        session.rate(Rating::Hard);

        assert_eq!(session.cards()[0].ease, 1.3);
        assert_eq!(session.cards()[0].reviews, 3);
    }

    #[test]
    fn test_clear() {
        let (mut session, repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);
        session.rate(Rating::Good);

        session.clear();

        assert!(!session.has_cards());
        assert_eq!(session.topic(), None);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.reviewed_count(), 0);
        let saved = repo.saved().unwrap();
        assert!(saved.cards.is_empty());
        assert!(saved.topic.is_none());
    }

    #[test]
    fn test_begin_generation_modes() {
        let (mut session, _repo) = session_with(Vec::new());
        assert!(matches!(
            session.begin_generation(GenerationIntent::More, 5),
            Err(SessionError::NothingToExtend)
        ));
        assert!(matches!(
            session.begin_generation(GenerationIntent::Topic("   ".to_string()), 5),
            Err(SessionError::EmptyTopic)
        ));
        assert!(!session.is_generating());

        let request = session
            .begin_generation(GenerationIntent::Topic("Biology".to_string()), 5)
            .unwrap();
        assert_eq!(request.mode, GenerationMode::for_topic("Biology"));
        assert!(session.is_generating());
    }

    #[test]
    fn test_single_generation_in_flight() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0)]);

        let request = session.begin_generation(GenerationIntent::More, 5).unwrap();
        assert!(matches!(
            session.begin_generation(GenerationIntent::More, 5),
            Err(SessionError::AlreadyGenerating)
        ));

        session
            .finish_generation(&request, Ok(batch(&["extra"])))
            .unwrap();
        assert!(!session.is_generating());
        assert!(session.begin_generation(GenerationIntent::More, 5).is_ok());
    }

    #[test]
    fn test_cancel_generation() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0)]);

        session.begin_generation(GenerationIntent::More, 5).unwrap();
        session.cancel_generation();

        assert!(!session.is_generating());
        assert_eq!(session.total_cards(), 1);
    }

    #[test]
    fn test_topic_generation_replaces_deck() {
        let (mut session, repo) = session_with(vec![card(4, 2.5, 0), card(9, 2.5, 0)]);
        session.next_card();
        session.rate(Rating::Good);

        let request = session
            .begin_generation(GenerationIntent::Topic("Chemistry".to_string()), 2)
            .unwrap();
        let added = session
            .finish_generation(&request, Ok(batch(&["What is an atom?", "What is a bond?"])))
            .unwrap();

        assert_eq!(added, 2);
        let ids: Vec<u32> = session.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(session.topic(), Some("Chemistry"));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.reviewed_count(), 0);
        assert_eq!(session.last_reasoning(), Some("Build from basics."));
        assert!(session.cards().iter().all(|c| c.ease == 2.5 && c.reviews == 0));
        assert_eq!(repo.saved().unwrap().topic.as_deref(), Some("Chemistry"));
    }

    #[test]
    fn test_more_generation_appends_with_next_ids() {
        let (mut session, repo) = session_with(vec![card(3, 2.5, 0), card(7, 1.5, 2)]);

        let request = session.begin_generation(GenerationIntent::More, 2).unwrap();
        assert!(matches!(request.mode, GenerationMode::Remedial { .. }));
        session
            .finish_generation(&request, Ok(batch(&["a", "b"])))
            .unwrap();

        let ids: Vec<u32> = session.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 7, 8, 9]);
        assert_eq!(session.topic(), Some("Rust"));
        assert_eq!(repo.saved().unwrap().cards.len(), 4);
    }

    #[test]
    fn test_more_generation_refused_at_id_limit() {
        let (mut session, repo) = session_with(vec![card(u32::MAX, 1.5, 2)]);
        let saves_before = repo.save_count();

        assert!(matches!(
            session.begin_generation(GenerationIntent::More, 1),
            Err(SessionError::IdsExhausted)
        ));
        assert!(!session.is_generating());
        assert_eq!(session.total_cards(), 1);
        assert_eq!(repo.save_count(), saves_before);
    }

    #[test]
    fn test_more_generation_refused_when_batch_would_overflow_ids() {
        let (mut session, _repo) = session_with(vec![card(u32::MAX - 2, 1.5, 2)]);

        assert!(matches!(
            session.begin_generation(GenerationIntent::More, 3),
            Err(SessionError::IdsExhausted)
        ));
        assert!(session.begin_generation(GenerationIntent::More, 2).is_ok());
    }

    #[test]
    fn test_oversized_batch_is_truncated_at_id_limit() {
        let (mut session, _repo) = session_with(vec![card(u32::MAX - 1, 1.5, 2)]);

        let request = session.begin_generation(GenerationIntent::More, 1).unwrap();
        let added = session
            .finish_generation(&request, Ok(batch(&["a", "b", "c"])))
            .unwrap();

        assert_eq!(added, 1);
        let ids: Vec<u32> = session.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![u32::MAX - 1, u32::MAX]);
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0)]);

        assert!(matches!(
            session.begin_generation(GenerationIntent::More, 0),
            Err(SessionError::InvalidCount)
        ));
        assert!(matches!(
            session.begin_generation(GenerationIntent::Topic("Rust".to_string()), 0),
            Err(SessionError::InvalidCount)
        ));
        assert!(!session.is_generating());
    }

    #[test]
    fn test_failed_generation_keeps_state() {
        let (mut session, repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);
        let saves_before = repo.save_count();
        let cards_before = session.cards().to_vec();

        let request = session
            .begin_generation(GenerationIntent::Topic("Physics".to_string()), 5)
            .unwrap();
        let result = session.finish_generation(
            &request,
            Err(GenerationError::Api {
                status: 529,
                message: "Overloaded".to_string(),
            }),
        );

        assert!(matches!(result, Err(SessionError::Generation(_))));
        assert_eq!(session.cards(), cards_before.as_slice());
        assert_eq!(session.topic(), Some("Rust"));
        assert!(!session.is_generating());
        assert_eq!(session.generation_error(), Some("API error: 529 - Overloaded"));
        assert_eq!(repo.save_count(), saves_before);
    }

    #[test]
    fn test_new_generation_clears_previous_error() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0)]);

        let request = session.begin_generation(GenerationIntent::More, 1).unwrap();
        let _ = session.finish_generation(&request, Err(GenerationError::AuthFailed));
        assert!(session.generation_error().is_some());

        session.begin_generation(GenerationIntent::More, 1).unwrap();
        assert!(session.generation_error().is_none());
    }

    #[tokio::test]
    async fn test_generate_round_trip() {
        let (mut session, _repo) = session_with(vec![card(1, 2.5, 0), card(2, 2.5, 0)]);
        let generator = ScriptedGenerator::new(Ok(batch(&["deeper"])));

        let added = session
            .generate(&generator, GenerationIntent::More, 1)
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(session.cards()[2].id, 3);
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0].mode, GenerationMode::Varied { .. }));
    }

    #[tokio::test]
    async fn test_generate_failure_surfaces_error() {
        let (mut session, _repo) = session_with(Vec::new());
        let generator = ScriptedGenerator::new(Err(GenerationError::Schema("bad".to_string())));

        let result = session
            .generate(&generator, GenerationIntent::Topic("Rust".to_string()), 5)
            .await;

        assert!(result.is_err());
        assert!(!session.has_cards());
        assert_eq!(session.generation_error(), Some("Invalid response: bad"));
    }
}
