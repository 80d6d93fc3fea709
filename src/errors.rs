/*!
 * Error types for the bidimark application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by a direction classifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectionError {
    /// The classifier could not decide on a direction for the text
    #[error("Failed to classify text {text:?}: {reason}")]
    Classification {
        /// The sub-line that was being classified
        text: String,
        /// Why classification failed
        reason: String,
    },
}

/// Errors that can occur while marking a document
#[derive(Error, Debug)]
pub enum MarkError {
    /// Classification of one of the line's sub-lines failed
    #[error("Line {index}: {source}")]
    Line {
        /// Zero-based index of the line in the document
        index: usize,
        /// The underlying classifier error
        #[source]
        source: DirectionError,
    },
}

impl MarkError {
    /// Index of the line that could not be marked
    pub fn line_index(&self) -> usize {
        match self {
            Self::Line { index, .. } => *index,
        }
    }
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file extension or content matches no supported subtitle format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The content could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// One-based line number in the source text
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The content held no usable subtitle entry
    #[error("No valid subtitle entries were found")]
    NoEntries,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from direction marking
    #[error("Marking error: {0}")]
    Mark(#[from] MarkError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

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
