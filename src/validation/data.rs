use crate::core::Reading;
use crate::processing::parser::{ANGLE_KEY, DISTANCE_KEY};
use crate::validation::error::{ProcessingError, ProcessingResult};
use log::warn;

/// Summary of the timestamp column of one dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimestampReport {
    /// Number of samples checked
    pub samples: usize,
    /// Steps where time went backwards. Tolerated, not reordered.
    pub backward_steps: Vec<usize>,
    /// Smallest positive step (s)
    pub min_step: Option<f64>,
    /// Largest positive step (s)
    pub max_step: Option<f64>,
}

impl TimestampReport {
    pub fn is_monotonic(&self) -> bool {
        self.backward_steps.is_empty()
    }
}

/// Data-quality checks run on the timestamps before any processing
#[derive(Debug, Clone, Default)]
pub struct TimestampValidator;

impl TimestampValidator {
    pub fn new() -> Self {
        Self
    }

    /// Reject non-finite or repeated timestamps; report backward steps
    pub fn validate(&self, times: &[f64]) -> ProcessingResult<TimestampReport> {
        let mut report = TimestampReport {
            samples: times.len(),
            ..Default::default()
        };

        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(ProcessingError::InvalidParameter {
                parameter: "time".to_string(),
                reason: format!("non-finite timestamp at sample {}", index),
            });
        }

        for (i, pair) in times.windows(2).enumerate() {
            let dt = pair[1] - pair[0];
            if dt == 0.0 {
                return Err(ProcessingError::DuplicateTimestamp {
                    index: i + 1,
                    time: pair[1],
                });
            }
            if dt < 0.0 {
                report.backward_steps.push(i + 1);
                continue;
            }
            report.min_step = Some(report.min_step.map_or(dt, |m| m.min(dt)));
            report.max_step = Some(report.max_step.map_or(dt, |m| m.max(dt)));
        }

        if !report.is_monotonic() {
            warn!(
                "Timestamps go backwards at {} sample(s), first at sample {}",
                report.backward_steps.len(),
                report.backward_steps[0]
            );
        }

        Ok(report)
    }
}

/// Rejects readings the Kalman filter cannot absorb.
///
/// A single non-finite voltage would poison the filter state for every later
/// sample, and smoothing spreads it backwards too.
#[derive(Debug, Clone, Default)]
pub struct ReadingValidator;

impl ReadingValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, readings: &[Reading]) -> ProcessingResult<()> {
        let channels: [(&str, fn(&Reading) -> f64); 2] = [
            (DISTANCE_KEY, |r| r.distance_voltage),
            (ANGLE_KEY, |r| r.angle_voltage),
        ];
        for (parameter, voltage) in channels {
            if let Some(index) = readings.iter().position(|r| !voltage(r).is_finite()) {
                return Err(ProcessingError::InvalidParameter {
                    parameter: parameter.to_string(),
                    reason: format!("non-finite voltage {} at sample {}", voltage(&readings[index]), index),
                });
            }
        }
        Ok(())
    }
}
