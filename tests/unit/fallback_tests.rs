/*!
 * Tests for the tokenizer and the fallback segmenter
 */

use subsense::fallback::{fallback_segment, joined_text, segment_cues, tokenize_cues, FallbackSegment, SegmentDifficulty};
use crate::common::cues;

#[test]
fn test_tokenizeCues_withMarkup_shouldKeepRawTextAndOffsets() {
    let cues = cues(&["<i>Hi</i>  you", "there"]);
    let tokens = tokenize_cues(&cues);
    let joined = joined_text(&cues);

    let summary: Vec<(usize, usize, &str)> = tokens
        .iter()
        .map(|t| (t.id, t.entry_index, t.text.as_str()))
        .collect();
    assert_eq!(summary, vec![(0, 0, "<i>Hi</i>"), (1, 0, "you"), (2, 1, "there")]);

    for token in &tokens {
        assert_eq!(&joined[token.char_start..token.char_end], token.text);
    }
    assert_eq!((tokens[2].char_start, tokens[2].char_end), (15, 20));
}

#[test]
fn test_tokenizeCues_withEmptyCues_shouldStillAdvanceOffsets() {
    let cues = cues(&["", "a", "", "b"]);
    let tokens = tokenize_cues(&cues);
    let joined = joined_text(&cues);

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].entry_index, 3);
    assert_eq!(&joined[tokens[1].char_start..tokens[1].char_end], "b");
}

#[test]
fn test_fallbackSegment_withLinkAndDeicticWords_shouldExtendShortSegments() {
    let segments = segment_cues(&cues(&["Stop that", "and this now"]));

    assert_eq!(segments, vec![
        FallbackSegment::new(0, 0, 4, "Stop that and this"),
        FallbackSegment::new(1, 4, 5, "now"),
    ]);
}

#[test]
fn test_fallbackSegment_withoutLinkWords_shouldCloseEveryToken() {
    let segments = segment_cues(&cues(&["one two three"]));

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(segments[2].id, "fallback_2");
}

#[test]
fn test_fallbackSegment_atFiveTokens_shouldCloseRegardlessOfNextWord() {
    let segments = segment_cues(&cues(&["a and and and and and b"]));

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["a and and and and", "and", "b"]);
    assert_eq!((segments[0].word_start, segments[0].word_end), (0, 5));
}

#[test]
fn test_fallbackSegment_withUppercaseLinkWord_shouldMatchCaseInsensitively() {
    let segments = segment_cues(&cues(&["Go THEN run"]));

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Go THEN", "run"]);
}

#[test]
fn test_fallbackSegment_withNoTokens_shouldReturnEmpty() {
    assert!(fallback_segment(&[]).is_empty());
    assert!(segment_cues(&[]).is_empty());
}

#[test]
fn test_fallbackSegment_serialization_shouldUseCamelCase() {
    let segments = segment_cues(&cues(&["hello"]));
    let json = serde_json::to_value(&segments[0]).unwrap();

    assert_eq!(json["id"], "fallback_0");
    assert_eq!(json["wordStart"], 0);
    assert_eq!(json["wordEnd"], 1);
    assert_eq!(json["reasoning"], serde_json::json!(["fallback_heuristic"]));
    assert_eq!(json["difficulty"]["cefr"], "B1");
    assert_eq!(json["difficulty"]["score"], 5);
    assert_eq!(json["features"], serde_json::json!([]));
}

#[test]
fn test_fallbackSegment_shouldBeTaggedAsHeuristicWithDefaultDifficulty() {
    let segments = segment_cues(&cues(&["so it goes", "on and on"]));

    assert!(!segments.is_empty());
    for segment in &segments {
        assert!(segment.is_fallback());
        assert_eq!(segment.difficulty, SegmentDifficulty::default());
        assert_eq!(segment.difficulty.cefr, "B1");
        assert!(segment.features.is_empty());
    }
}
