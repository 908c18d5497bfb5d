use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use log::warn;

use crate::errors::AnalysisError;

// @module: Extraction of the JSON document from free-form model output

// @const: Reasoning block emitted by some models
static THINK_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

// @const: Object wrapped in <json> markers
static JSON_MARKER_OBJECT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<json>\s*(\{.*?\})\s*</json>").unwrap()
});

// @const: Array wrapped in <json> markers
static JSON_MARKER_ARRAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<json>\s*(\[.*?\])\s*</json>").unwrap()
});

// @const: Outermost object span
static BARE_OBJECT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

// @const: Outermost array span
static BARE_ARRAY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Locate the JSON payload in a model answer.
///
/// Reasoning blocks are dropped, `<json>` markers win, otherwise the outermost
/// `{...}` (then `[...]`) span is used.
pub fn extract_json(content: &str) -> Option<String> {
    let cleaned = THINK_BLOCK_REGEX.replace_all(content, "");
    let cleaned = cleaned.trim();

    let marked = JSON_MARKER_OBJECT_REGEX
        .captures(cleaned)
        .or_else(|| JSON_MARKER_ARRAY_REGEX.captures(cleaned))
        .and_then(|caps| caps.get(1));

    marked
        .or_else(|| BARE_OBJECT_REGEX.find(cleaned))
        .or_else(|| BARE_ARRAY_REGEX.find(cleaned))
        .map(|m| m.as_str().to_string())
}

/// Parse the structured document out of a model answer
pub fn parse_structured_response<T: DeserializeOwned>(content: &str) -> Result<T, AnalysisError> {
    let Some(json) = extract_json(content) else {
        warn!("No JSON found in model response: {}", preview(content));
        return Err(AnalysisError::InvalidResponse("no JSON found in response".to_string()));
    };

    serde_json::from_str(&json).map_err(|e| {
        warn!("Failed to parse JSON from model response: {}", preview(content));
        AnalysisError::InvalidResponse(e.to_string())
    })
}

fn preview(content: &str) -> String {
    content.chars().take(200).collect()
}
