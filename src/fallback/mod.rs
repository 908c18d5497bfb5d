/*!
 * Degraded segmentation path.
 *
 * When sentence segmentation by the analysis service is unavailable, cues are
 * tokenized on whitespace and grouped by a simple link-word heuristic. The
 * result is coarse and not sentence-aware.
 */

pub mod segmenter;
pub mod tokenizer;

pub use segmenter::{fallback_segment, FallbackSegment, SegmentDifficulty};
pub use tokenizer::{joined_text, tokenize_cues, Token};

use crate::subtitle_processor::Cue;

/// Tokenize and segment in one step
pub fn segment_cues(cues: &[Cue]) -> Vec<FallbackSegment> {
    fallback_segment(&tokenize_cues(cues))
}
