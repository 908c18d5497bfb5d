/*!
 * Common test utilities for the subsense test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subsense::subtitle_processor::Cue;


/// Route library logs through env_logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// SubRip content whose sentences cross cue boundaries
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:02,500
Hello there,

2
00:00:02,600 --> 00:00:04,000
how are you? I'm

3
00:00:04,100 --> 00:00:06,000
fine. Thanks.
";

/// WebVTT content with a header, a comment and an unnumbered cue
pub const SAMPLE_VTT: &str = "WEBVTT

// a comment line

1
00:00:01.000 --> 00:00:03.000
<i>Wait...</i>

00:00:03.500 --> 00:00:05.000
...for me!
";

/// Creates a sample SubRip file
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Creates a sample WebVTT file
pub fn create_test_vtt(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_VTT)
}

/// A cue with one-second timing derived from its id
pub fn cue(id: i64, text: &str) -> Cue {
    let start = subsense::timecode::format_timestamp((id as u64) * 1_000, '.');
    let end = subsense::timecode::format_timestamp((id as u64) * 1_000 + 900, '.');
    Cue::new(id, start, end, text)
}

/// Cues numbered from 1 for the given texts
pub fn cues(texts: &[&str]) -> Vec<Cue> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| cue(index as i64 + 1, text))
        .collect()
}
