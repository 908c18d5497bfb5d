/*!
 * Subtitle timestamp codec.
 *
 * Timestamps travel through the crate as the strings found in the source file
 * (`HH:MM:SS,mmm` for SRT, `HH:MM:SS.mmm` for WebVTT). This module converts them
 * to integer milliseconds and back. Two parsing paths exist:
 *
 * - [`parse_time_to_ms`] is the best-effort path used by the sentence engine and
 *   the UI-facing helpers. It never fails; anything it cannot read becomes `0`.
 * - [`try_parse_time_to_ms`] is the strict path for callers that want to reject
 *   malformed input instead.
 *
 * No floating point is involved anywhere.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimecodeError;

// @const: Strict HH:MM:SS[.,]mmm form
static STRICT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[,.](\d{3})$").unwrap()
});

const MS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// The zero timestamp used for cues without timing information (plain text).
pub const ZERO_TIMESTAMP: &str = "00:00:00.000";

/// Best-effort conversion of a timestamp string to milliseconds.
///
/// Accepts `HH:MM:SS.mmm`, `HH:MM:SS,mmm`, `MM:SS(.mmm)` and `SS(.mmm)`. A comma is
/// treated exactly like a period. Empty fields count as zero and the fractional
/// part is read as milliseconds (`.5` is 500 ms). Anything unreadable yields `0`.
pub fn parse_time_to_ms(time_str: &str) -> u64 {
    let time_str = time_str.trim();
    if time_str.is_empty() {
        return 0;
    }

    let normalized = time_str.replacen(',', ".", 1);
    let mut halves = normalized.split('.');
    let time_part = halves.next().unwrap_or_default();
    let ms_part = halves.next().unwrap_or_default();

    let mut fields = Vec::with_capacity(3);
    for field in time_part.split(':') {
        match parse_field(field) {
            Some(value) => fields.push(value),
            None => return 0,
        }
    }

    let seconds = match fields.as_slice() {
        [h, m, s] => h
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|v| v.checked_add(m.checked_mul(SECONDS_PER_MINUTE)?))
            .and_then(|v| v.checked_add(*s)),
        [m, s] => m
            .checked_mul(SECONDS_PER_MINUTE)
            .and_then(|v| v.checked_add(*s)),
        [s] => Some(*s),
        _ => None,
    };

    let millis = if ms_part.is_empty() {
        Some(0)
    } else {
        parse_millis(ms_part)
    };

    match (seconds, millis) {
        (Some(seconds), Some(millis)) => seconds
            .checked_mul(MS_PER_SECOND)
            .and_then(|v| v.checked_add(millis))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Strict conversion of an `HH:MM:SS.mmm` / `HH:MM:SS,mmm` timestamp.
pub fn try_parse_time_to_ms(time_str: &str) -> Result<u64, TimecodeError> {
    let caps = STRICT_TIMESTAMP_REGEX
        .captures(time_str.trim())
        .ok_or_else(|| TimecodeError::Malformed(time_str.to_string()))?;

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    let hours = component(1);
    let minutes = component(2);
    let seconds = component(3);
    let millis = component(4);

    if minutes >= SECONDS_PER_MINUTE || seconds >= SECONDS_PER_MINUTE {
        return Err(TimecodeError::OutOfRange(time_str.to_string()));
    }

    Ok((hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds) * MS_PER_SECOND + millis)
}

/// Whether the string is a valid strict timestamp
pub fn is_valid_timestamp(time_str: &str) -> bool {
    try_parse_time_to_ms(time_str).is_ok()
}

/// Render milliseconds as `MM:SS` or `HH:MM:SS`.
///
/// The sub-second remainder is truncated, never rounded. Without hours the
/// minute field wraps at 60.
pub fn format_time(ms: u64, use_hours: bool) -> String {
    let total_seconds = ms / MS_PER_SECOND;
    let seconds = total_seconds % SECONDS_PER_MINUTE;
    let minutes = (total_seconds / SECONDS_PER_MINUTE) % 60;
    let hours = total_seconds / SECONDS_PER_HOUR;

    if use_hours {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Render milliseconds as a full `HH:MM:SS{separator}mmm` timestamp
pub fn format_timestamp(ms: u64, separator: char) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, separator, millis)
}

// Empty fields count as zero, like a missing component.
fn parse_field(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    field.parse().ok()
}

// Milliseconds come from the first three characters, right-padded with zeros.
fn parse_millis(ms_part: &str) -> Option<u64> {
    let padded: String = ms_part.chars().chain(std::iter::repeat('0')).take(3).collect();
    let digits: String = padded.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
