//! Append-only record log shared by the acquisition side and the processor

use crate::core::Reading;
use crate::processing::parser::{ParsedReadings, ReadingParser};
use crate::validation::error::{ProcessingError, ProcessingResult};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Newline-delimited JSON file of readings, one object per line
#[derive(Debug, Clone)]
pub struct RecordLog {
    path: PathBuf,
}

impl RecordLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one reading
    pub fn append(&self, reading: &Reading) -> ProcessingResult<()> {
        self.append_all(std::slice::from_ref(reading))
    }

    /// Append readings in order. Existing lines are never rewritten.
    pub fn append_all(&self, readings: &[Reading]) -> ProcessingResult<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for reading in readings {
            let line = serde_json::to_string(reading).map_err(|e| ProcessingError::Io {
                message: format!("Failed to encode reading: {}", e),
            })?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        debug!("Appended {} reading(s) to {}", readings.len(), self.path.display());
        Ok(())
    }

    /// Parse the log, skipping malformed lines. A missing log reads as empty.
    pub fn read(&self) -> ProcessingResult<ParsedReadings> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ParsedReadings::default()),
            Err(e) => return Err(e.into()),
        };
        ReadingParser::new().parse_reader(BufReader::new(file))
    }

    /// Empty the log and remove the plot rendered from it, if any
    pub fn clear<P: AsRef<Path>>(&self, plot_path: P) -> ProcessingResult<()> {
        fs::File::create(&self.path)?;
        match fs::remove_file(plot_path.as_ref()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!("Cleared {}", self.path.display());
        Ok(())
    }
}
