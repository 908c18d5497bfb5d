/*!
 * Sentence-boundary detection.
 *
 * The normalizer only post-processes whatever a detector returns, so any
 * deterministic splitter can be plugged in through [`SentenceDetector`].
 * [`RuleBasedDetector`] is the built-in one: a sentence ends after a run of
 * terminal punctuation (`.` `!` `?` `…`), optionally followed by closing quotes
 * or brackets, when whitespace or the end of the text comes next. Punctuation
 * glued to the following word (`U.S.`, `...for`) never ends a sentence.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// @const: Terminal punctuation run, closers, then whitespace or end of text
static BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([.!?…]+["'”’»)\]]*)(\s+|$)"#).unwrap()
});

/// A raw sentence range over the concatenated stream (byte offsets)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSentence {
    /// First byte of the sentence
    pub start: usize,
    /// One past the last byte of the sentence
    pub end: usize,
    /// The covered text
    pub text: String,
}

impl RawSentence {
    /// Create a sentence covering `text[start..end]`.
    ///
    /// Returns `None` when the range is reversed, out of bounds or not on `char` boundaries.
    pub fn from_range(text: &str, start: usize, end: usize) -> Option<Self> {
        text.get(start..end).map(|slice| Self {
            start,
            end,
            text: slice.to_string(),
        })
    }
}

/// Capability that splits text into ordered sentence ranges.
///
/// Implementations must be deterministic and return ranges in text order.
pub trait SentenceDetector {
    /// Split `text` into sentences
    fn segment(&self, text: &str) -> Vec<RawSentence>;
}

impl<F> SentenceDetector for F
where
    F: Fn(&str) -> Vec<RawSentence>,
{
    fn segment(&self, text: &str) -> Vec<RawSentence> {
        self(text)
    }
}

/// Punctuation-driven detector used by default
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedDetector;

impl RuleBasedDetector {
    /// Create the detector
    pub fn new() -> Self {
        Self
    }
}

impl SentenceDetector for RuleBasedDetector {
    fn segment(&self, text: &str) -> Vec<RawSentence> {
        let mut sentences = Vec::new();
        let mut cursor = 0;

        for caps in BOUNDARY_REGEX.captures_iter(text) {
            let (Some(whole), Some(terminal)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if let Some(sentence) = trimmed_range(text, cursor, terminal.end()) {
                sentences.push(sentence);
            }
            cursor = whole.end();
        }

        if cursor < text.len() {
            if let Some(sentence) = trimmed_range(text, cursor, text.len()) {
                sentences.push(sentence);
            }
        }

        sentences
    }
}

// Shrinks [start, end) past surrounding whitespace; None when nothing is left.
fn trimmed_range(text: &str, start: usize, end: usize) -> Option<RawSentence> {
    let slice = &text[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();

    let from = start + leading;
    let to = end - trailing;
    if from >= to {
        return None;
    }
    RawSentence::from_range(text, from, to)
}
