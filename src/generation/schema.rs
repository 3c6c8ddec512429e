//! Structured output contract for generated cards

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::GenerationError;

/// Name of the tool the model is forced to call
pub const TOOL_NAME: &str = "record_flashcards";

/// One generated question/answer pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub front: String,
    pub back: String,
}

/// What the model must return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBatch {
    pub cards: Vec<GeneratedCard>,
    pub reasoning: String,
}

impl GeneratedBatch {
    /// Parse and validate the tool input produced by the model
    pub fn from_tool_input(input: Value) -> Result<Self, GenerationError> {
        let batch: GeneratedBatch =
            serde_json::from_value(input).map_err(|e| GenerationError::Schema(e.to_string()))?;
        batch.validate()?;
        Ok(batch)
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.cards.is_empty() {
            return Err(GenerationError::Schema("response contained no cards".to_string()));
        }
        if let Some(pos) = self
            .cards
            .iter()
            .position(|c| c.front.trim().is_empty() || c.back.trim().is_empty())
        {
            return Err(GenerationError::Schema(format!(
                "card {} has an empty front or back",
                pos + 1
            )));
        }
        Ok(())
    }
}

/// JSON Schema handed to the model as the tool's input schema
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "cards": {
                "type": "array",
                "description": "Array of flashcards to generate. Each card should cover a distinct concept. Order from fundamental to more advanced concepts.",
                "items": {
                    "type": "object",
                    "properties": {
                        "front": {
                            "type": "string",
                            "description": "The question or prompt shown on the front of the flashcard. Should be clear, specific, and test exactly one concept. Avoid yes/no questions - prefer 'what', 'how', 'why' questions that require recall."
                        },
                        "back": {
                            "type": "string",
                            "description": "The answer shown on the back of the flashcard. Should be concise but complete - typically 1-3 sentences. Include the essential information needed to correctly answer the question."
                        }
                    },
                    "required": ["front", "back"]
                }
            },
            "reasoning": {
                "type": "string",
                "description": "Brief explanation (1-2 sentences) of the pedagogical approach taken - why these specific cards were chosen and how they help the learner."
            }
        },
        "required": ["cards", "reasoning"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let batch = GeneratedBatch::from_tool_input(json!({
            "cards": [{ "front": "What is 2 + 2?", "back": "4" }],
            "reasoning": "Arithmetic warm-up."
        }))
        .unwrap();

        assert_eq!(batch.cards.len(), 1);
        assert_eq!(batch.reasoning, "Arithmetic warm-up.");
    }

    #[test]
    fn test_missing_reasoning() {
        let result = GeneratedBatch::from_tool_input(json!({
            "cards": [{ "front": "Q", "back": "A" }]
        }));
        assert!(matches!(result, Err(GenerationError::Schema(_))));
    }

    #[test]
    fn test_wrong_card_shape() {
        let result = GeneratedBatch::from_tool_input(json!({
            "cards": [{ "question": "Q", "answer": "A" }],
            "reasoning": "r"
        }));
        assert!(matches!(result, Err(GenerationError::Schema(_))));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let result = GeneratedBatch::from_tool_input(json!({ "cards": [], "reasoning": "r" }));
        match result {
            Err(GenerationError::Schema(msg)) => assert!(msg.contains("no cards")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_back_rejected() {
        let result = GeneratedBatch::from_tool_input(json!({
            "cards": [{ "front": "Q1", "back": "A1" }, { "front": "Q2", "back": "  " }],
            "reasoning": "r"
        }));
        match result {
            Err(GenerationError::Schema(msg)) => assert!(msg.contains("card 2")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_requires_both_fields() {
        let schema = output_schema();
        assert_eq!(schema["required"], json!(["cards", "reasoning"]));
        assert_eq!(schema["properties"]["cards"]["items"]["required"], json!(["front", "back"]));
    }
}
