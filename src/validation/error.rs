use crate::processing::parser::ParseError;
use crate::utils::config::ConfigError;
use std::fmt;

/// Failures that abort a processing run.
///
/// Per-line parse failures are normally absorbed by the parser and only
/// surface here when the caller parses a single line directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// A single input line could not be turned into a reading
    Parse(ParseError),
    /// Fewer samples than a stage needs
    InsufficientData { required: usize, available: usize },
    /// Two consecutive samples share a timestamp, so the time step is zero
    DuplicateTimestamp { index: usize, time: f64 },
    /// The neighbours of an interior sample share a timestamp
    DegenerateSpacing { index: usize },
    /// A parameter or input value is outside its valid domain
    InvalidParameter { parameter: String, reason: String },
    /// Reading the input or writing an artifact failed
    Io { message: String },
    /// The plot could not be assembled
    Render { message: String },
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::Parse(err) => write!(f, "Parse error: {}", err),
            ProcessingError::InsufficientData { required, available } => {
                write!(f, "Insufficient data: need {} samples, got {}", required, available)
            }
            ProcessingError::DuplicateTimestamp { index, time } => {
                write!(f, "Duplicate timestamp {} s at sample {}: time step is zero", time, index)
            }
            ProcessingError::DegenerateSpacing { index } => {
                write!(f, "Degenerate time spacing around sample {}", index)
            }
            ProcessingError::InvalidParameter { parameter, reason } => {
                write!(f, "Invalid parameter '{}': {}", parameter, reason)
            }
            ProcessingError::Io { message } => write!(f, "I/O error: {}", message),
            ProcessingError::Render { message } => write!(f, "Render error: {}", message),
        }
    }
}

impl std::error::Error for ProcessingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessingError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for ProcessingError {
    fn from(err: ParseError) -> Self {
        ProcessingError::Parse(err)
    }
}

impl From<ConfigError> for ProcessingError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidParameter { parameter, value, reason } => ProcessingError::InvalidParameter {
                parameter,
                reason: format!("{} (got {})", reason, value),
            },
            ConfigError::IoError { message } => ProcessingError::Io { message },
            ConfigError::SerializationError { message } => ProcessingError::InvalidParameter {
                parameter: "config".to_string(),
                reason: message,
            },
        }
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::Io {
            message: err.to_string(),
        }
    }
}

impl From<fmt::Error> for ProcessingError {
    fn from(err: fmt::Error) -> Self {
        ProcessingError::Render {
            message: err.to_string(),
        }
    }
}

/// Result alias used across the processing stages
pub type ProcessingResult<T> = Result<T, ProcessingError>;
