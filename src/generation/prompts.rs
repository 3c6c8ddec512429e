//! Prompt shaping for card generation

use crate::flashcards::algorithm::{weak_cards, DEFAULT_WEAK_COUNT};
use crate::flashcards::Flashcard;

const BASE_ROLE: &str =
    "You are an expert educational content creator specializing in spaced repetition learning.";

/// What kind of cards to ask for
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationMode {
    /// A fresh deck on a new topic, fundamentals first
    Topic { topic: String },
    /// Nothing reviewed yet: branch out from the existing questions
    Varied { fronts: Vec<String> },
    /// Target the cards the learner keeps getting wrong
    Remedial { weak: Vec<Flashcard> },
}

impl GenerationMode {
    pub fn for_topic(topic: &str) -> Self {
        Self::Topic {
            topic: topic.trim().to_string(),
        }
    }

    /// Mode for extending an existing deck, `None` if the deck is empty
    pub fn extending(cards: &[Flashcard]) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }

        let weak = weak_cards(cards, DEFAULT_WEAK_COUNT);
        if weak.is_empty() {
            Some(Self::Varied {
                fronts: cards.iter().map(|c| c.front.clone()).collect(),
            })
        } else {
            Some(Self::Remedial { weak })
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Topic { .. } => "topic",
            Self::Varied { .. } => "varied",
            Self::Remedial { .. } => "weak areas",
        }
    }
}

/// A fully shaped generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(mode: GenerationMode, count: usize) -> Self {
        Self { mode, count }
    }

    pub fn system_prompt(&self) -> String {
        match &self.mode {
            GenerationMode::Topic { .. } => format!(
                "{BASE_ROLE}
Your task is to create a comprehensive set of beginner-friendly flashcards on a given topic.

Guidelines:
- Start with fundamental concepts and build up
- Each question should test one specific concept
- Answers should be brief but complete
- Cover the most important aspects of the topic
- Avoid overly obscure or advanced material for initial cards"
            ),
            GenerationMode::Varied { .. } => format!(
                "{BASE_ROLE}
Your task is to create high-quality flashcards that are clear, concise, and effective for learning.

Guidelines:
- Each question should test one specific concept
- Answers should be brief but complete
- Avoid ambiguous or trick questions
- Cover related concepts to reinforce learning"
            ),
            GenerationMode::Remedial { .. } => format!(
                "{BASE_ROLE}
Your task is to help users strengthen their weak areas by creating targeted flashcards.

Guidelines:
- Analyze the difficult cards to understand what concepts the user struggles with
- Create cards that approach these concepts from different angles
- Break down complex topics into simpler sub-concepts
- Provide related practice questions that build understanding"
            ),
        }
    }

    pub fn user_prompt(&self) -> String {
        let count = self.count;
        match &self.mode {
            GenerationMode::Topic { topic } => format!(
                "Create {count} flashcards about: {topic}

Start with the fundamentals and include a mix of:
- Basic definitions and concepts
- Key facts and figures
- Important relationships and connections"
            ),
            GenerationMode::Varied { fronts } => format!(
                "The user is learning with these flashcards:
{}

Create {count} new flashcards that explore related topics or go deeper into these subjects.",
                fronts.join("\n")
            ),
            GenerationMode::Remedial { weak } => {
                let weak_info = weak
                    .iter()
                    .map(|c| {
                        format!(
                            "- \"{}\" → \"{}\" (ease: {:.2}, reviews: {})",
                            c.front, c.back, c.ease, c.reviews
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "The user is struggling with these flashcards (lower ease = more difficulty):
{weak_info}

Create {count} new flashcards that will help strengthen understanding of these weak areas.
Focus on:
1. Breaking down the concepts into smaller pieces
2. Providing different perspectives on the same material
3. Creating bridge cards that connect to easier concepts"
                )
            }
        }
    }
}
