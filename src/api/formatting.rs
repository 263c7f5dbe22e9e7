//! Tabular export of derived series
//!
//! CSV for spreadsheets and JSON for the presentation layer. Both keep one
//! entry per input sample.

use crate::core::DerivedSeries;
use crate::validation::error::ProcessingResult;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// CSV formatter configuration
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Decimal places written for each value
    pub precision: usize,
    /// Emit the column header line
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self {
            precision: 6,
            include_header: true,
        }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header line, without trailing newline
    pub fn header(&self) -> String {
        let mut header = String::from("time");
        for (name, _) in DerivedSeries::default().panels() {
            header.push(',');
            header.push_str(name);
        }
        header
    }

    /// Format every sample as one row. Non-finite values are written as `NaN`.
    pub fn format(&self, series: &DerivedSeries) -> String {
        let mut out = String::new();
        if self.include_header {
            out.push_str(&self.header());
            out.push('\n');
        }

        let panels = series.panels();
        for (i, t) in series.time.iter().enumerate() {
            // Writing into a String cannot fail
            let _ = write!(out, "{:.*}", self.precision, t);
            for (_, values) in &panels {
                match values.get(i) {
                    Some(v) if v.is_finite() => {
                        let _ = write!(out, ",{:.*}", self.precision, v);
                    }
                    _ => out.push_str(",NaN"),
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn write_to<P: AsRef<Path>>(&self, series: &DerivedSeries, path: P) -> ProcessingResult<()> {
        write_artifact(path.as_ref(), &self.format(series))
    }
}

/// JSON formatter configuration
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty print JSON output
    pub pretty_print: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the series as an object of parallel arrays. Non-finite
    /// values become `null`.
    pub fn format(&self, series: &DerivedSeries) -> Result<String, serde_json::Error> {
        if self.pretty_print {
            serde_json::to_string_pretty(series)
        } else {
            serde_json::to_string(series)
        }
    }

    pub fn write_to<P: AsRef<Path>>(&self, series: &DerivedSeries, path: P) -> ProcessingResult<()> {
        let content = self.format(series).map_err(|e| crate::validation::ProcessingError::Render {
            message: format!("Failed to serialize series: {}", e),
        })?;
        write_artifact(path.as_ref(), &content)
    }
}

/// Write an artifact, creating missing parent directories
pub(crate) fn write_artifact(path: &Path, content: &str) -> ProcessingResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
