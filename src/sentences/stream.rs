/*!
 * Concatenated text stream built from a cue list.
 *
 * Every cue contributes one chunk: its text with markup stripped and whitespace
 * collapsed. Chunks are joined with a single space and each chunk remembers its
 * byte range inside the joined string. Ranges are contiguous, non-overlapping
 * and strictly increasing in cue order; the stream never changes after `build`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::Cue;

// @const: HTML-like tag
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// A cue's footprint inside the concatenated stream
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Originating cue
    pub cue: &'a Cue,
    /// First byte of the chunk in the stream
    pub start_char: usize,
    /// One past the last byte of the chunk in the stream
    pub end_char: usize,
}

impl Chunk<'_> {
    /// Whether the chunk carries no text at all
    pub fn is_empty(&self) -> bool {
        self.start_char >= self.end_char
    }

    /// Overlap of the chunk with `[start, end)`, if it is non-empty
    pub fn overlap(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let from = self.start_char.max(start);
        let to = self.end_char.min(end);
        (from < to).then_some((from, to))
    }
}

/// Joined cue text plus the per-cue chunk map
#[derive(Debug, Clone)]
pub struct ConcatenatedStream<'a> {
    text: String,
    chunks: Vec<Chunk<'a>>,
}

impl<'a> ConcatenatedStream<'a> {
    /// Build the stream for `cues`, in order
    pub fn build(cues: &'a [Cue]) -> Self {
        let mut text = String::new();
        let mut chunks = Vec::with_capacity(cues.len());

        for (index, cue) in cues.iter().enumerate() {
            let normalized = clean_cue_text(&cue.text);

            let start_char = text.len();
            text.push_str(&normalized);
            let end_char = text.len();

            chunks.push(Chunk { cue, start_char, end_char });

            if index + 1 < cues.len() {
                text.push(' ');
            }
        }

        Self { text, chunks }
    }

    /// The joined text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Chunks in stream order
    pub fn chunks(&self) -> &[Chunk<'a>] {
        &self.chunks
    }

    /// Byte slice of the stream, clamped to its bounds
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.text.len());
        let start = start.min(end);
        self.text.get(start..end).unwrap_or_default()
    }

    /// Chunks sharing at least one byte with `[start, end)`, in stream order
    pub fn overlapping(&self, start: usize, end: usize) -> Vec<&Chunk<'a>> {
        if start >= end {
            return Vec::new();
        }

        // Chunk ranges are sorted, so skip everything that ends before `start`.
        let first = self.chunks.partition_point(|chunk| chunk.end_char <= start);

        self.chunks[first..]
            .iter()
            .take_while(|chunk| chunk.start_char < end)
            .filter(|chunk| chunk.overlap(start, end).is_some())
            .collect()
    }
}

/// Strip markup tags and collapse whitespace runs into single spaces
pub fn clean_cue_text(text: &str) -> String {
    collapse_whitespace(&TAG_REGEX.replace_all(text, ""))
}

/// Collapse whitespace runs into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
