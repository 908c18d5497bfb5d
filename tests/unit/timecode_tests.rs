/*!
 * Tests for the timestamp codec
 */

use subsense::errors::TimecodeError;
use subsense::timecode::{
    format_time, format_timestamp, is_valid_timestamp, parse_time_to_ms, try_parse_time_to_ms,
};

#[test]
fn test_parseTimeToMs_withFullTimestamp_shouldReturnMillis() {
    assert_eq!(parse_time_to_ms("01:23:45.678"), 5_025_678);
    assert_eq!(parse_time_to_ms("00:00:00.000"), 0);
}

#[test]
fn test_parseTimeToMs_withComma_shouldMatchPeriod() {
    assert_eq!(parse_time_to_ms("00:01:02,345"), parse_time_to_ms("00:01:02.345"));
    assert_eq!(parse_time_to_ms("00:01:02,345"), 62_345);
}

#[test]
fn test_parseTimeToMs_withShortForms_shouldDefaultMissingFields() {
    assert_eq!(parse_time_to_ms("01:02"), 62_000);
    assert_eq!(parse_time_to_ms("45"), 45_000);
    assert_eq!(parse_time_to_ms("00:00:01.5"), 1_500);
}

#[test]
fn test_parseTimeToMs_withGarbage_shouldReturnZero() {
    assert_eq!(parse_time_to_ms(""), 0);
    assert_eq!(parse_time_to_ms("abc"), 0);
    assert_eq!(parse_time_to_ms("1:2:3:4"), 0);
    assert_eq!(parse_time_to_ms("xx:10:00.000"), 0);
}

#[test]
fn test_formatTime_withSubSecondRemainder_shouldTruncate() {
    assert_eq!(format_time(3_723_999, true), "01:02:03");
    assert_eq!(format_time(3_723_999, false), "02:03");
    assert_eq!(format_time(59_999, false), "00:59");
    assert_eq!(format_time(0, true), "00:00:00");
}

#[test]
fn test_formatTime_withParsedTimestamp_shouldMatchWholeSeconds() {
    for t in ["00:00:00.000", "01:02:03.000", "10:59:59.000", "23:00:01.000"] {
        let formatted = format_time(parse_time_to_ms(t), true);
        assert_eq!(formatted, &t[..8]);
    }
}

#[test]
fn test_formatTimestamp_withParsedTimestamp_shouldRoundTrip() {
    for t in ["00:00:00.000", "00:00:01.001", "01:23:45.678", "99:59:59.999"] {
        assert_eq!(format_timestamp(parse_time_to_ms(t), '.'), t);
    }
    assert_eq!(format_timestamp(62_345, ','), "00:01:02,345");
}

#[test]
fn test_tryParseTimeToMs_withValidTimestamp_shouldParse() {
    assert_eq!(try_parse_time_to_ms("00:01:02,345"), Ok(62_345));
    assert!(is_valid_timestamp("12:00:00.000"));
}

#[test]
fn test_tryParseTimeToMs_withInvalidInput_shouldFail() {
    assert!(matches!(try_parse_time_to_ms("01:02"), Err(TimecodeError::Malformed(_))));
    assert!(matches!(try_parse_time_to_ms("00:61:00.000"), Err(TimecodeError::OutOfRange(_))));
    assert!(!is_valid_timestamp("soon"));
}
