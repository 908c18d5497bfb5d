use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Cue;

// @module: Whitespace tokenizer over joined cue text

// @const: A run of non-whitespace characters
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

// @struct: One word with its position in the joined cue text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    // @field: Global sequential id, starting at 0
    pub id: usize,

    // @field: Index of the cue the word came from
    pub entry_index: usize,

    // @field: Byte offset of the word in the joined text
    pub char_start: usize,

    // @field: Byte offset one past the word
    pub char_end: usize,

    pub text: String,
}

/// Split cue texts into word tokens.
///
/// Offsets refer to the raw cue texts joined with single spaces; no markup
/// stripping happens here.
pub fn tokenize_cues(cues: &[Cue]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for (entry_index, cue) in cues.iter().enumerate() {
        for word in WORD_REGEX.find_iter(&cue.text) {
            tokens.push(Token {
                id: tokens.len(),
                entry_index,
                char_start: offset + word.start(),
                char_end: offset + word.end(),
                text: word.as_str().to_string(),
            });
        }
        offset += cue.text.len() + 1;
    }

    tokens
}

/// The text the token offsets point into
pub fn joined_text(cues: &[Cue]) -> String {
    cues.iter().map(|cue| cue.text.as_str()).collect::<Vec<_>>().join(" ")
}
