/*!
 * Sentence reconstruction from subtitle cues.
 *
 * - `stream`: the concatenated cue text and its per-cue chunk map
 * - `detector`: the sentence-boundary capability and the built-in detector
 * - `normalizer`: merge heuristics and card assembly
 * - `view`: an owned cue list with lazily derived cards
 */

pub mod detector;
pub mod normalizer;
pub mod stream;
pub mod view;

pub use detector::{RawSentence, RuleBasedDetector, SentenceDetector};
pub use normalizer::{
    apply_heuristics, has_terminal_mark, is_likely_abbreviation, normalize_to_sentences,
    normalize_with_detector, NormalizeOptions, SentenceCard, SentenceSpan, DEFAULT_ABBREVIATIONS,
};
pub use stream::{Chunk, ConcatenatedStream};
pub use view::{SentenceContext, SentenceView};
