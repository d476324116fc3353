//! Error types and handling infrastructure for JSON to CSV/XML conversion

use anyhow::Error;
use std::fmt;
use std::path::PathBuf;

/// Core error types for the conversion process
#[derive(Debug, thiserror::Error)]
pub enum ConversionErrorKind {
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("JSON too large: {size} bytes (limit: {limit} bytes)")]
    JsonTooLarge { size: usize, limit: usize },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Conversion failed: {message}")]
    ConversionFailed { message: String },
}

impl ConversionErrorKind {
    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    FormatError(#[from] FormatError),

    #[error("{kind}")]
    Conversion {
        kind: ConversionErrorKind,
        source: Option<anyhow::Error>,
    },

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConversionError {
    pub fn conversion(kind: ConversionErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConversionErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::conversion_with_source(ConversionErrorKind::io(err.to_string(), path), err.into())
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::ParseError(err) => {
                if let Some((line, col)) = err.location {
                    format!(
                        "JSON parse error at line {}, column {}: {}",
                        line, col, err.message
                    )
                } else {
                    format!("JSON parse error: {}", err.message)
                }
            }
            Self::FormatError(err) => match err {
                FormatError::UnsupportedShape { found } => format!(
                    "Cannot convert {} to CSV: expected an object or an array of objects",
                    found
                ),
                FormatError::DepthExceeded { limit } => format!(
                    "Input is nested deeper than {} levels; raise --max-depth to allow it",
                    limit
                ),
                FormatError::Serialization { .. } => format!("Formatting error: {}", err),
            },
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::JsonTooLarge { size, limit } => {
                    format!(
                        "JSON input too large: {} bytes (limit: {} bytes)",
                        size, limit
                    )
                }
                ConversionErrorKind::Io {
                    message,
                    path: Some(path),
                } => format!("{}: {}", path.display(), message),
                _ => self.to_string(),
            },
            Self::Other(err) => {
                format!("Unexpected error: {}", err)
            }
        }
    }
}

/// JSON parsing errors
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub location: Option<(usize, usize)>,
    pub input_preview: Option<String>,
}

impl ParseError {
    pub fn new(message: String, location: Option<(usize, usize)>) -> Self {
        Self {
            message,
            location,
            input_preview: None,
        }
    }

    pub fn with_preview(mut self, preview: String) -> Self {
        self.input_preview = Some(preview);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some((line, col)) = self.location {
            write!(f, " at line {}, column {}", line, col)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Errors raised by the CSV and XML transcoders
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// CSV was requested for something other than an object or an array
    /// of objects
    #[error("Unsupported shape for CSV: found {found}, expected an object or an array of objects")]
    UnsupportedShape { found: String },

    /// Input nesting went past the configured limit
    #[error("Maximum nesting depth ({limit}) exceeded")]
    DepthExceeded { limit: usize },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl FormatError {
    pub fn unsupported_shape(found: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            found: found.into(),
        }
    }

    pub fn serialization(message: String) -> Self {
        Self::Serialization { message }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convenience result type for formatting operations
pub type FormattingResult<T> = Result<T, FormatError>;
