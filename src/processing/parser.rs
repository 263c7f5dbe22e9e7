use crate::core::Reading;
use crate::validation::error::{ProcessingError, ProcessingResult};
use log::{debug, warn};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Wire keys of one newline-delimited JSON record
pub const DISTANCE_KEY: &str = "distance_reading";
pub const ANGLE_KEY: &str = "angle_reading";
pub const TIME_KEY: &str = "time";

/// Errors that can occur while parsing a single record line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The line is not valid JSON
    InvalidJson { line: usize, details: String },
    /// The line is JSON but not an object
    NotAnObject { line: usize },
    /// A required key is absent
    MissingField { line: usize, field: String },
    /// A required key is present but not a finite number
    InvalidField { line: usize, field: String, value: String },
    /// The line is not valid UTF-8
    InvalidEncoding { line: usize },
}

impl ParseError {
    /// 1-based line number the error refers to
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. }
            | ParseError::NotAnObject { line }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidField { line, .. }
            | ParseError::InvalidEncoding { line } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidJson { line, details } => write!(f, "Invalid JSON on line {}: {}", line, details),
            ParseError::NotAnObject { line } => write!(f, "Record on line {} is not a JSON object", line),
            ParseError::MissingField { line, field } => write!(f, "Missing field '{}' on line {}", field, line),
            ParseError::InvalidField { line, field, value } => {
                write!(f, "Field '{}' on line {} is not a number: {}", field, line, value)
            }
            ParseError::InvalidEncoding { line } => write!(f, "Line {} is not valid UTF-8", line),
        }
    }
}

impl std::error::Error for ParseError {}

/// Outcome of parsing a whole record stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReadings {
    /// Readings in file order
    pub readings: Vec<Reading>,
    /// Lines that were skipped, with the reason
    pub skipped: Vec<ParseError>,
}

/// Parser for the line-delimited JSON records written by the acquisition board
#[derive(Debug, Clone, Default)]
pub struct ReadingParser {
    strict: bool,
}

impl ReadingParser {
    /// Create a lenient parser: malformed lines are skipped with a warning
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Enable or disable strict mode, where the first malformed line aborts parsing
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Parse one record. `line` is the 1-based line number used in errors.
    pub fn parse_line(&self, line: usize, text: &str) -> Result<Reading, ParseError> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|e| ParseError::InvalidJson {
            line,
            details: e.to_string(),
        })?;

        let object = value.as_object().ok_or(ParseError::NotAnObject { line })?;

        let field = |name: &str| -> Result<f64, ParseError> {
            let raw = object.get(name).ok_or_else(|| ParseError::MissingField {
                line,
                field: name.to_string(),
            })?;
            raw.as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseError::InvalidField {
                    line,
                    field: name.to_string(),
                    value: raw.to_string(),
                })
        };

        Ok(Reading {
            distance_voltage: field(DISTANCE_KEY)?,
            angle_voltage: field(ANGLE_KEY)?,
            timestamp_seconds: field(TIME_KEY)?,
        })
    }

    /// Parse an in-memory record stream
    pub fn parse_str(&self, content: &str) -> Result<ParsedReadings, ParseError> {
        let mut parsed = ParsedReadings::default();
        for (index, text) in content.lines().enumerate() {
            self.accept(index + 1, text, &mut parsed)?;
        }
        Ok(parsed)
    }

    /// Parse a buffered record stream.
    ///
    /// A line that is not valid UTF-8 is a malformed record like any other.
    /// Other I/O failures end the stream.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> ProcessingResult<ParsedReadings> {
        let mut parsed = ParsedReadings::default();
        let mut buffer = Vec::new();
        let mut line = 0;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line += 1;
            match std::str::from_utf8(&buffer) {
                Ok(text) => self.accept(line, text, &mut parsed)?,
                Err(_) => self.reject(ParseError::InvalidEncoding { line }, &mut parsed)?,
            }
        }
        Ok(parsed)
    }

    /// Parse a record file from disk
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ProcessingResult<ParsedReadings> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ProcessingError::Io {
            message: format!("Failed to read '{}': {}", path.display(), e),
        })?;
        debug!("Parsing records from {}", path.display());
        self.parse_reader(BufReader::new(file))
    }

    fn accept(&self, line: usize, text: &str, parsed: &mut ParsedReadings) -> Result<(), ParseError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        match self.parse_line(line, text) {
            Ok(reading) => {
                parsed.readings.push(reading);
                Ok(())
            }
            Err(err) => self.reject(err, parsed),
        }
    }

    fn reject(&self, err: ParseError, parsed: &mut ParsedReadings) -> Result<(), ParseError> {
        if self.strict {
            return Err(err);
        }
        warn!("Skipping malformed record: {}", err);
        parsed.skipped.push(err);
        Ok(())
    }
}
