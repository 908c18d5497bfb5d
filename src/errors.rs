/*!
 * Error types for the subsense library.
 *
 * The sentence engine itself never fails; only the cue parser, the strict
 * time codec path and the external collaborators surface errors. All of them
 * are defined here with the thiserror crate.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while reading and parsing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The selected format parser produced zero cues
    #[error("no valid subtitles found (format: {format})")]
    NoValidSubtitles {
        /// Name of the format that was tried
        format: String,
    },

    /// The uploaded file exceeds the configured size ceiling
    #[error("subtitle file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual file size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// The file extension is not one of srt, vtt or txt
    #[error("unsupported subtitle extension: {0}")]
    UnsupportedExtension(String),
}

/// Errors produced by the strict timestamp parsing path
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimecodeError {
    /// The string is not in HH:MM:SS.mmm / HH:MM:SS,mmm form
    #[error("malformed timestamp: {0}")]
    Malformed(String),

    /// Minutes or seconds are outside 0..60
    #[error("timestamp component out of range: {0}")]
    OutOfRange(String),
}

/// Errors that can occur while analysing a sentence with the language model
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model answered, but not with the expected JSON document
    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),

    /// No API key configured for the analysis provider
    #[error("Analysis API key is missing (set analysis.api_key or OPENROUTER_API_KEY)")]
    MissingApiKey,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from sentence analysis
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
