/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::fs;
use subsense::errors::SubtitleError;
use subsense::file_utils::FileManager;
use crate::common;

#[test]
fn test_isSubtitleFile_shouldAcceptKnownExtensions() {
    assert!(FileManager::is_subtitle_file("a.srt"));
    assert!(FileManager::is_subtitle_file("a.VTT"));
    assert!(FileManager::is_subtitle_file("notes.txt"));
    assert!(!FileManager::is_subtitle_file("movie.mkv"));
    assert!(!FileManager::is_subtitle_file("README"));
}

#[test]
fn test_findSubtitleFiles_withNestedDirs_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    FileManager::ensure_dir(&nested)?;

    common::create_test_subtitle(&nested, "b.srt")?;
    common::create_test_vtt(temp_dir.path(), "a.vtt")?;
    common::create_test_file(temp_dir.path(), "cover.jpg", "not a subtitle")?;
    common::create_test_file(temp_dir.path(), "a.sentences.json", "[]")?;

    let files = FileManager::find_subtitle_files(temp_dir.path())?;

    assert_eq!(files, vec![temp_dir.path().join("a.vtt"), nested.join("b.srt")]);
    Ok(())
}

#[test]
fn test_readSubtitleFile_withBomAndInvalidUtf8_shouldDecodeLossily() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("latin1.srt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"1\n00:00:01,000 --> 00:00:02,000\nCaf");
    bytes.push(0xE9);
    fs::write(&path, bytes)?;

    let content = FileManager::read_subtitle_file(&path, 1024)?;

    assert!(content.starts_with("1\n"));
    assert!(content.ends_with("Caf\u{fffd}"));
    Ok(())
}

#[test]
fn test_readSubtitleFile_overSizeLimit_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "big.srt")?;

    let error = FileManager::read_subtitle_file(&path, 10).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SubtitleError>(),
        Some(SubtitleError::FileTooLarge { limit: 10, .. })
    ));
    Ok(())
}

#[test]
fn test_readSubtitleFile_withUnsupportedExtension_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.mkv", "data")?;

    let error = FileManager::read_subtitle_file(&path, 1024).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SubtitleError>(),
        Some(SubtitleError::UnsupportedExtension(ext)) if ext == "mkv"
    ));
    Ok(())
}

#[test]
fn test_writeToFile_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("deep").join("file.json");

    FileManager::write_to_file(&path, "[]")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "[]");
    Ok(())
}

#[test]
fn test_generateOutputPath_shouldUseStemAndSuffix() {
    let path = FileManager::generate_output_path("/subs/Show.S01E01.srt", "/out", "sentences.json");
    assert_eq!(path, std::path::PathBuf::from("/out/Show.S01E01.sentences.json"));
}
