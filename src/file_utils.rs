use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::debug;

use crate::errors::SubtitleError;
use crate::subtitle_processor::CueFormat;

// @module: File and directory utilities

// @const: Extensions accepted as subtitle uploads
pub const SUBTITLE_EXTENSIONS: [&str; 3] = ["srt", "vtt", "txt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Extension is srt, vtt or txt
    pub fn is_subtitle_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| CueFormat::from_extension(&ext.to_string_lossy()).is_some())
    }

    // @generates: `<stem>.<suffix>` next to the input or inside `output_dir`
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);

        output_dir.as_ref().join(output_filename)
    }

    /// Find subtitle files (srt, vtt, txt) below a directory, sorted by path
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_subtitle_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        debug!("Found {} subtitle files in {:?}", result.len(), dir.as_ref());
        Ok(result)
    }

    /// Read a subtitle file, enforcing the size limit.
    ///
    /// Invalid UTF-8 is replaced rather than rejected and a leading BOM is dropped.
    pub fn read_subtitle_file<P: AsRef<Path>>(path: P, max_size_bytes: u64) -> Result<String> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        if CueFormat::from_extension(&extension).is_none() {
            return Err(SubtitleError::UnsupportedExtension(extension).into());
        }

        let size = fs::metadata(path)
            .with_context(|| format!("Failed to read file metadata: {:?}", path))?
            .len();
        if size > max_size_bytes {
            return Err(SubtitleError::FileTooLarge { size, limit: max_size_bytes }.into());
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(decode_text(&bytes))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Lossy UTF-8 decoding with BOM removal
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}
