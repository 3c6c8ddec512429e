use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use flashdeck_lib::flashcards::{GenerationIntent, Rating, ReviewSession};
use flashdeck_lib::generation::{CardGenerator, GeneratedBatch, GenerationError, GenerationRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    /// First run: no cards, ask for a topic
    TopicInput,
    /// Study the current deck
    Review,
}

/// A generation running on the background runtime
struct PendingGeneration {
    request: GenerationRequest,
    handle: JoinHandle<Result<GeneratedBatch, GenerationError>>,
}

pub struct TuiState {
    pub session: ReviewSession,

    // Topic entry
    pub topic_input: String,

    pub flash_message: Option<String>,
    pub confirm_clear: bool,
    pub show_help: bool,
    pub quit: bool,

    card_count: usize,
    runtime: Runtime,
    generator: Arc<dyn CardGenerator>,
    pending: Option<PendingGeneration>,
}

impl TuiState {
    pub fn new(
        session: ReviewSession,
        generator: Arc<dyn CardGenerator>,
        card_count: usize,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        Ok(Self {
            session,
            topic_input: String::new(),
            flash_message: None,
            confirm_clear: false,
            show_help: false,
            quit: false,
            card_count,
            runtime,
            generator,
            pending: None,
        })
    }

    pub fn screen(&self) -> Screen {
        if self.session.has_cards() {
            Screen::Review
        } else {
            Screen::TopicInput
        }
    }

    pub fn is_generating(&self) -> bool {
        self.session.is_generating()
    }

    // ==================== Review ====================

    pub fn flip(&mut self) {
        self.session.flip();
    }

    /// Ratings only count once the answer is showing
    pub fn rate(&mut self, rating: Rating) {
        if self.session.is_flipped() {
            self.session.rate(rating);
        }
    }

    pub fn next_card(&mut self) {
        self.session.next_card();
    }

    pub fn prev_card(&mut self) {
        self.session.prev_card();
    }

    pub fn request_clear(&mut self) {
        if !self.is_generating() {
            self.confirm_clear = true;
        }
    }

    pub fn confirm_clear(&mut self, confirmed: bool) {
        self.confirm_clear = false;
        if confirmed {
            self.session.clear();
            self.topic_input.clear();
            self.flash_message = Some("Deck cleared".to_string());
        }
    }

    // ==================== Generation ====================

    pub fn submit_topic(&mut self) {
        let topic = self.topic_input.trim().to_string();
        if topic.is_empty() {
            return;
        }
        self.start_generation(GenerationIntent::Topic(topic));
    }

    pub fn generate_more(&mut self) {
        self.start_generation(GenerationIntent::More);
    }

    fn start_generation(&mut self, intent: GenerationIntent) {
        let request = match self.session.begin_generation(intent, self.card_count) {
            Ok(request) => request,
            Err(e) => {
                self.flash_message = Some(e.to_string());
                return;
            }
        };

        let generator = Arc::clone(&self.generator);
        let task_request = request.clone();
        let handle = self
            .runtime
            .spawn(async move { generator.generate(&task_request).await });

        self.pending = Some(PendingGeneration { request, handle });
    }

    /// Merge a finished generation into the session; call once per tick
    pub fn poll_generation(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map_or(false, |p| p.handle.is_finished());
        if !finished {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        let outcome = match self.runtime.block_on(pending.handle) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Generation task failed: {}", e);
                self.session.cancel_generation();
                self.flash_message = Some("Generation stopped unexpectedly".to_string());
                return;
            }
        };

        // Failures are kept in the session's error for display
        if let Ok(added) = self.session.finish_generation(&pending.request, outcome) {
            self.topic_input.clear();
            self.flash_message = Some(format!("Added {} cards", added));
        }
    }

    pub fn cancel_generation(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            self.session.cancel_generation();
            self.flash_message = Some("Generation cancelled".to_string());
        }
    }
}
