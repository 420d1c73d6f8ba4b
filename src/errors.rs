/*!
 * Error types for the mdtranslate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Ratio rejections are deliberately absent: a rejected translation is a normal
 * outcome of the gate, not an error.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
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
}

/// Errors that can occur while translating a single part
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The provider failed for a specific part of the document
    #[error("Failed to translate part {part:?}: {source}")]
    Part {
        /// Text that was sent to the provider
        part: String,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },
}

impl TranslationError {
    /// Attach the offending part text to a provider failure
    pub fn for_part(part: impl Into<String>, source: ProviderError) -> Self {
        Self::Part {
            part: part.into(),
            source,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Reading the input stream failed before end of stream
    #[error("Read error: {0}")]
    Read(String),

    /// Writing translated output failed
    #[error("Write error: {0}")]
    Write(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

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
