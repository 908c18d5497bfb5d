use serde::{Deserialize, Serialize};

use super::tokenizer::Token;

// @module: Token-merge segmentation used when no AI segmentation is available

// @const: Words that glue a short segment to what follows
const LINK_WORDS: [&str; 7] = ["and", "but", "so", "because", "then", "however", "moreover"];

// @const: Deictic words that keep a short segment open
const DEICTIC_WORDS: [&str; 3] = ["this", "that", "it"];

// @const: Segments at or above this many tokens always close
const SHORT_SEGMENT_TOKENS: usize = 5;

// @const: Reasoning tag carried by every heuristic segment
pub const FALLBACK_REASONING: &str = "fallback_heuristic";

// @struct: Difficulty estimate attached to a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDifficulty {
    pub cefr: String,
    pub score: u8,
    pub factors: Vec<String>,
}

impl Default for SegmentDifficulty {
    // Unanalysed segments sit in the middle of the scale
    fn default() -> Self {
        Self {
            cefr: "B1".to_string(),
            score: 5,
            factors: Vec::new(),
        }
    }
}

// @struct: Coarse segment over a token range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSegment {
    // @field: "fallback_N", N counting from 0
    pub id: String,

    // @field: Id of the first token
    pub word_start: usize,

    // @field: Id one past the last token
    pub word_end: usize,

    // @field: Token texts joined with single spaces
    pub text: String,

    // @field: How the segment was produced
    pub reasoning: Vec<String>,

    // @field: Placeholder difficulty until the segment is analysed
    pub difficulty: SegmentDifficulty,

    // @field: Grammar features; always empty here
    pub features: Vec<String>,
}

impl FallbackSegment {
    /// Segment number `index` over tokens `word_start..word_end`
    pub fn new(index: usize, word_start: usize, word_end: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("fallback_{}", index),
            word_start,
            word_end,
            text: text.into(),
            reasoning: vec![FALLBACK_REASONING.to_string()],
            difficulty: SegmentDifficulty::default(),
            features: Vec::new(),
        }
    }

    /// Whether the segment came from the heuristic rather than an analysis
    pub fn is_fallback(&self) -> bool {
        self.reasoning.iter().any(|r| r == FALLBACK_REASONING)
    }
}

fn keeps_segment_open(token: &Token) -> bool {
    let word = token.text.to_lowercase();
    LINK_WORDS.contains(&word.as_str()) || DEICTIC_WORDS.contains(&word.as_str())
}

/// Group tokens into coarse segments.
///
/// A segment stays open while it is shorter than five tokens and the next
/// token is a linking word or a deictic; otherwise it closes after the
/// current token.
pub fn fallback_segment(tokens: &[Token]) -> Vec<FallbackSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<&Token> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        current.push(token);

        if current.len() < SHORT_SEGMENT_TOKENS {
            if let Some(next) = tokens.get(index + 1) {
                if keeps_segment_open(next) {
                    continue;
                }
            }
        }

        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let text = current.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
            segments.push(FallbackSegment::new(segments.len(), first.id, last.id + 1, text));
        }
        current.clear();
    }

    segments
}
