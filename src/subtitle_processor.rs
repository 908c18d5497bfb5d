use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::timecode;

// @module: Subtitle file parsing (SRT, WebVTT, plain text)

// @const: SRT timing line
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

// @const: WebVTT timing line
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}\.\d{3}) --> (\d{2}:\d{2}:\d{2}\.\d{3})").unwrap()
});

// @const: Blank-line block separator
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @const: Bare integer cue identifier (WebVTT)
static CUE_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @struct: Single raw subtitle cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    // @field: Source-assigned sequence number
    pub id: i64,

    // @field: Start timestamp as written in the source
    pub start: String,

    // @field: End timestamp as written in the source
    pub end: String,

    // @field: Raw cue text (may contain markup)
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(id: i64, start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Cue {
            id,
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }

    /// Start time in milliseconds (best effort, 0 when unreadable)
    pub fn start_ms(&self) -> u64 {
        timecode::parse_time_to_ms(&self.start)
    }

    /// End time in milliseconds (best effort, 0 when unreadable)
    pub fn end_ms(&self) -> u64 {
        timecode::parse_time_to_ms(&self.end)
    }

    /// Display duration; inverted ranges count as zero
    pub fn duration_ms(&self) -> u64 {
        self.end_ms().saturating_sub(self.start_ms())
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueFormat {
    /// SubRip
    Srt,
    /// WebVTT
    Vtt,
    /// One cue per non-blank line, no timing
    PlainText,
}

impl CueFormat {
    // @returns: Format for a recognised extension (srt, vtt, txt)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::Vtt),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    // @returns: Format guessed from the content
    // Any `-->` marker means SRT, even under a WEBVTT header; dot timestamps then parse to nothing.
    pub fn detect(content: &str) -> Self {
        if content.contains("-->") {
            Self::Srt
        } else if content.trim_start_matches('\u{feff}').trim_start().starts_with("WEBVTT") {
            Self::Vtt
        } else {
            Self::PlainText
        }
    }

    /// Pick a format from the file name hint, falling back to content sniffing
    pub fn resolve(content: &str, filename_hint: &str) -> Self {
        Path::new(filename_hint)
            .extension()
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or_else(|| Self::detect(content))
    }

    /// Lowercase name of the format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::PlainText => "txt",
        }
    }
}

impl fmt::Display for CueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse subtitle content, choosing the format from the file name or the content.
///
/// Malformed blocks are skipped. The call only fails when nothing usable is left.
pub fn parse(content: &str, filename_hint: &str) -> Result<Vec<Cue>, SubtitleError> {
    let format = CueFormat::resolve(content, filename_hint);
    debug!("Parsing '{}' as {}", filename_hint, format);
    parse_with_format(content, format)
}

/// Parse subtitle content with an already known format
pub fn parse_with_format(content: &str, format: CueFormat) -> Result<Vec<Cue>, SubtitleError> {
    let content = normalize_line_endings(content);

    let cues = match format {
        CueFormat::Srt => parse_srt(&content),
        CueFormat::Vtt => parse_vtt(&content),
        CueFormat::PlainText => parse_plain_text(&content),
    };

    if cues.is_empty() {
        return Err(SubtitleError::NoValidSubtitles {
            format: format.name().to_string(),
        });
    }

    debug!("Parsed {} cues ({})", cues.len(), format);
    Ok(cues)
}

// Drops a leading BOM and turns CRLF / CR into LF.
fn normalize_line_endings(content: &str) -> String {
    content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Parse SubRip blocks: id line, timing line, one or more text lines
fn parse_srt(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    for (block_index, block) in BLOCK_SEPARATOR_REGEX.split(content.trim()).enumerate() {
        let lines: Vec<&str> = block.trim().split('\n').collect();
        if lines.len() < 3 {
            debug!("Skipping SRT block {}: expected at least 3 lines, got {}", block_index + 1, lines.len());
            continue;
        }

        let Ok(id) = lines[0].trim().parse::<i64>() else {
            debug!("Skipping SRT block {}: invalid id '{}'", block_index + 1, lines[0].trim());
            continue;
        };

        let Some(caps) = SRT_TIMESTAMP_REGEX.captures(lines[1]) else {
            debug!("Skipping SRT block {}: invalid timing line '{}'", block_index + 1, lines[1].trim());
            continue;
        };

        let start = caps.get(1).map_or(timecode::ZERO_TIMESTAMP, |m| m.as_str());
        let end = caps.get(2).map_or(timecode::ZERO_TIMESTAMP, |m| m.as_str());
        let text = join_text_lines(&lines[2..]);

        cues.push(Cue::new(id, start, end, text));
    }

    cues
}

/// Parse WebVTT cues: optional header, comments, optional numeric id, timing line, text
fn parse_vtt(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let lines: Vec<&str> = content.split('\n').collect();
    let mut i = 0;

    if lines.first().is_some_and(|l| l.trim().eq_ignore_ascii_case("WEBVTT")) {
        i = 1;
    }

    while i < lines.len() {
        while i < lines.len() && (lines[i].trim().is_empty() || lines[i].trim().starts_with("//")) {
            i += 1;
        }
        if i >= lines.len() {
            break;
        }

        let mut cue_id = cues.len() as i64 + 1;
        if CUE_ID_REGEX.is_match(lines[i].trim()) {
            cue_id = lines[i].trim().parse().unwrap_or(cue_id);
            i += 1;
        }

        let Some(caps) = lines.get(i).and_then(|line| VTT_TIMESTAMP_REGEX.captures(line)) else {
            if let Some(line) = lines.get(i) {
                debug!("Skipping VTT line {}: '{}'", i + 1, line.trim());
            }
            i += 1;
            continue;
        };

        let start = caps.get(1).map_or(timecode::ZERO_TIMESTAMP, |m| m.as_str());
        let end = caps.get(2).map_or(timecode::ZERO_TIMESTAMP, |m| m.as_str());
        i += 1;

        let text_start = i;
        while i < lines.len() && !lines[i].trim().is_empty() {
            i += 1;
        }
        let text = join_text_lines(&lines[text_start..i]);

        cues.push(Cue::new(cue_id, start, end, text));
    }

    cues
}

/// Every non-blank line becomes one untimed cue
fn parse_plain_text(content: &str) -> Vec<Cue> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            Cue::new(index as i64 + 1, timecode::ZERO_TIMESTAMP, timecode::ZERO_TIMESTAMP, line)
        })
        .collect()
}

fn join_text_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parsed cues together with where they came from
#[derive(Debug, Clone)]
pub struct CueCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Format the cues were parsed as
    pub format: CueFormat,

    /// Cues in file order
    pub cues: Vec<Cue>,
}

impl CueCollection {
    /// Parse content read from `source_file`
    pub fn from_content(source_file: PathBuf, content: &str) -> Result<Self, SubtitleError> {
        let hint = source_file.to_string_lossy().to_string();
        let format = CueFormat::resolve(content, &hint);
        let cues = parse_with_format(content, format)?;

        Ok(CueCollection {
            source_file,
            format,
            cues,
        })
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the collection holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
