/*!
 * # subsense - sentence cards from subtitle files
 *
 * A Rust library that rebuilds whole sentences from subtitle cues and keeps
 * the link from every sentence back to the exact cue text it came from.
 *
 * ## Features
 *
 * - Parse SRT, WebVTT and plain-text subtitles into cues
 * - Rebuild sentences across cue boundaries with merge heuristics for
 *   abbreviations, ellipses and dash dialogue
 * - Coarse fallback segmentation when sentence detection is unavailable
 * - Optional language-model analysis (CEFR level, grammar, translations)
 *   with slang lookups
 *
 * ## Architecture
 *
 * - `timecode`: subtitle timestamp parsing and formatting
 * - `subtitle_processor`: cue parsing
 * - `sentences`: concatenated stream, sentence detection and card assembly
 * - `fallback`: tokenizer and link-word segmenter
 * - `analysis`: language-model analysis of sentence cards
 * - `providers`: language-model clients
 * - `slang`: Urban Dictionary lookups
 * - `app_config`: configuration management
 * - `file_utils`: file system operations
 * - `app_controller`: main application controller
 * - `errors`: custom error types
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod analysis;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod fallback;
pub mod file_utils;
pub mod providers;
pub mod sentences;
pub mod slang;
pub mod subtitle_processor;
pub mod timecode;

pub use app_config::Config;
pub use errors::{AnalysisError, AppError, ProviderError, SubtitleError, TimecodeError};
pub use fallback::{fallback_segment, tokenize_cues, FallbackSegment, Token};
pub use sentences::{normalize_to_sentences, NormalizeOptions, SentenceCard, SentenceSpan};
pub use subtitle_processor::{parse, Cue, CueCollection, CueFormat};
pub use timecode::{format_time, parse_time_to_ms};
