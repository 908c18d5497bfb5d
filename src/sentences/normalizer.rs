/*!
 * Sentence normalization.
 *
 * Cue text is joined into one stream, split into sentences by a
 * [`SentenceDetector`], patched up by the merge heuristics and projected back
 * onto the cues that contributed to each sentence.
 *
 * Heuristics run in a fixed order: abbreviation merge, ellipsis merge, then
 * leading-dash dialogue merge. Unterminated sentences longer than
 * `max_words_without_punct` words fall back to one card per source cue.
 *
 * Normalization is a pure function of its input and never fails.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Cue;
use super::detector::{RawSentence, RuleBasedDetector, SentenceDetector};
use super::stream::{collapse_whitespace, ConcatenatedStream};

// @const: One or two letters followed by a period ("A.", "St.")
static SHORT_ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-zА-Яа-яЁё]{1,2}\.$").unwrap()
});

const TERMINAL_MARKS: [char; 4] = ['.', '!', '?', '…'];

/// Default abbreviation list used by the merge heuristic
pub const DEFAULT_ABBREVIATIONS: [&str; 17] = [
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "St.", "vs.", "etc.", "e.g.", "i.e.",
    "U.S.", "U.K.", "U.N.", "p.m.", "a.m.",
];

fn default_max_words() -> usize {
    40
}

fn default_true() -> bool {
    true
}

fn default_abbreviations() -> Vec<String> {
    DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect()
}

/// Tunables for the merge heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Word limit for a sentence without terminal punctuation before it degrades to per-cue cards
    #[serde(default = "default_max_words")]
    pub max_words_without_punct: usize,

    /// Merge `...` / `...` continuations
    #[serde(default = "default_true")]
    pub merge_ellipsis: bool,

    /// Merge dash-led dialogue lines up to the next terminal mark
    #[serde(default = "default_true")]
    pub merge_leading_dash_dialogs: bool,

    /// Exact tokens treated as abbreviations
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_words_without_punct: default_max_words(),
            merge_ellipsis: true,
            merge_leading_dash_dialogs: true,
            abbreviations: default_abbreviations(),
        }
    }
}

/// Byte range of one cue's contribution to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceSpan {
    /// Id of the contributing cue
    pub raw_id: i64,
    /// Start offset in the concatenated stream
    pub abs_start_char: usize,
    /// End offset in the concatenated stream (exclusive)
    pub abs_end_char: usize,
}

/// A reconstructed sentence with timing and provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceCard {
    /// Sequential id, starting at 1
    pub id: usize,
    /// Whitespace-normalized sentence text
    pub text: String,
    /// Start timestamp of the first contributing cue
    pub start: String,
    /// End timestamp of the last contributing cue
    pub end: String,
    /// Distinct contributing cue ids, in order of first contribution
    pub source_ids: Vec<i64>,
    /// Per-cue contribution ranges, in stream order
    pub spans: Vec<SentenceSpan>,
}

impl SentenceCard {
    /// Number of whitespace separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Normalize cues into sentence cards with the built-in detector
pub fn normalize_to_sentences(cues: &[Cue], options: &NormalizeOptions) -> Vec<SentenceCard> {
    normalize_with_detector(cues, options, &RuleBasedDetector)
}

/// Normalize cues into sentence cards with a caller-supplied detector
pub fn normalize_with_detector<D>(cues: &[Cue], options: &NormalizeOptions, detector: &D) -> Vec<SentenceCard>
where
    D: SentenceDetector + ?Sized,
{
    if cues.is_empty() {
        return Vec::new();
    }

    let stream = ConcatenatedStream::build(cues);
    let text = stream.text();

    // Ranges are re-read from the stream; anything the detector got wrong is dropped.
    let base: Vec<RawSentence> = detector
        .segment(text)
        .into_iter()
        .filter(|s| s.start < s.end)
        .filter_map(|s| RawSentence::from_range(text, s.start, s.end))
        .collect();

    let sentences = apply_heuristics(base, options);

    let mut builder = CardBuilder::default();
    for sentence in &sentences {
        builder.push_sentence(&stream, sentence, options.max_words_without_punct);
    }
    builder.cards
}

/// Run the merge heuristics over detector output, in their fixed order
pub fn apply_heuristics(base: Vec<RawSentence>, options: &NormalizeOptions) -> Vec<RawSentence> {
    let mut sentences = merge_abbreviations(base, options);

    if options.merge_ellipsis {
        sentences = merge_ellipses(sentences);
    }

    if options.merge_leading_dash_dialogs {
        sentences = merge_dash_dialogs(sentences);
    }

    sentences
}

/// Whether a sentence is really an initial, a title or a listed abbreviation
pub fn is_likely_abbreviation(text: &str, options: &NormalizeOptions) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    options.abbreviations.iter().any(|abbr| abbr == trimmed)
        || SHORT_ABBREVIATION_REGEX.is_match(trimmed)
}

/// Whether the trimmed text ends with `.`, `!`, `?` or `…`
pub fn has_terminal_mark(text: &str) -> bool {
    text.trim_end().ends_with(TERMINAL_MARKS)
}

fn merge(current: RawSentence, next: &RawSentence) -> RawSentence {
    RawSentence {
        start: current.start,
        end: next.end,
        text: collapse_whitespace(&format!("{} {}", current.text, next.text)),
    }
}

// An abbreviation swallows exactly one following sentence.
fn merge_abbreviations(base: Vec<RawSentence>, options: &NormalizeOptions) -> Vec<RawSentence> {
    let mut merged = Vec::with_capacity(base.len());
    let mut iter = base.into_iter();

    while let Some(current) = iter.next() {
        if is_likely_abbreviation(&current.text, options) {
            if let Some(next) = iter.next() {
                merged.push(merge(current, &next));
                continue;
            }
        }
        merged.push(current);
    }

    merged
}

fn merge_ellipses(sentences: Vec<RawSentence>) -> Vec<RawSentence> {
    let mut merged = Vec::with_capacity(sentences.len());
    let mut iter = sentences.into_iter().peekable();

    while let Some(mut current) = iter.next() {
        while let Some(next) = iter.next_if(|next| {
            current.text.trim_end().ends_with("...") && next.text.trim_start().starts_with("...")
        }) {
            current = merge(current, &next);
        }
        merged.push(current);
    }

    merged
}

fn merge_dash_dialogs(sentences: Vec<RawSentence>) -> Vec<RawSentence> {
    let mut merged = Vec::with_capacity(sentences.len());
    let mut iter = sentences.into_iter();

    while let Some(mut current) = iter.next() {
        if current.text.trim_start().starts_with('-') {
            while !has_terminal_mark(&current.text) {
                let Some(next) = iter.next() else { break };
                current = merge(current, &next);
            }
        }
        merged.push(current);
    }

    merged
}

#[derive(Default)]
struct CardBuilder {
    cards: Vec<SentenceCard>,
}

impl CardBuilder {
    fn next_id(&self) -> usize {
        self.cards.len() + 1
    }

    fn push_sentence(&mut self, stream: &ConcatenatedStream<'_>, sentence: &RawSentence, max_words: usize) {
        let trimmed = sentence.text.trim();
        if trimmed.is_empty() {
            return;
        }

        let overlapping = stream.overlapping(sentence.start, sentence.end);
        if overlapping.is_empty() {
            debug!("Dropping sentence at {}..{}: no overlapping cue", sentence.start, sentence.end);
            return;
        }

        let word_count = trimmed.split_whitespace().count();
        if !has_terminal_mark(trimmed) && word_count > max_words {
            debug!(
                "Sentence at {}..{} has {} words and no terminal mark, splitting per cue",
                sentence.start, sentence.end, word_count
            );

            for chunk in overlapping {
                let Some((from, to)) = chunk.overlap(sentence.start, sentence.end) else {
                    continue;
                };
                let slice = stream.slice(from, to).trim();
                if slice.is_empty() {
                    continue;
                }

                let card = SentenceCard {
                    id: self.next_id(),
                    text: slice.to_string(),
                    start: chunk.cue.start.clone(),
                    end: chunk.cue.end.clone(),
                    source_ids: vec![chunk.cue.id],
                    spans: vec![SentenceSpan {
                        raw_id: chunk.cue.id,
                        abs_start_char: from,
                        abs_end_char: to,
                    }],
                };
                self.cards.push(card);
            }
            return;
        }

        let mut spans = Vec::with_capacity(overlapping.len());
        let mut pieces = Vec::with_capacity(overlapping.len());
        let mut source_ids: Vec<i64> = Vec::new();

        for chunk in &overlapping {
            let Some((from, to)) = chunk.overlap(sentence.start, sentence.end) else {
                continue;
            };

            pieces.push(stream.slice(from, to));
            spans.push(SentenceSpan {
                raw_id: chunk.cue.id,
                abs_start_char: from,
                abs_end_char: to,
            });
            if !source_ids.contains(&chunk.cue.id) {
                source_ids.push(chunk.cue.id);
            }
        }

        let text = collapse_whitespace(&pieces.join(" "));
        if text.is_empty() {
            return;
        }

        let (Some(first), Some(last)) = (overlapping.first(), overlapping.last()) else {
            return;
        };

        let card = SentenceCard {
            id: self.next_id(),
            text,
            start: first.cue.start.clone(),
            end: last.cue.end.clone(),
            source_ids,
            spans,
        };
        self.cards.push(card);
    }
}
