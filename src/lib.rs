//! Angle/distance rig signal processor
//!
//! Offline batch pipeline for a two-channel data-acquisition rig: raw
//! rangefinder and potentiometer voltages are Kalman filtered, converted to
//! physical units, smoothed with a Savitzky-Golay filter and differentiated
//! into velocity and acceleration, then rendered as a six-panel plot.

pub mod core;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;
pub mod args;

// Re-export commonly used types
pub use crate::core::{DerivedSeries, Reading};
pub use processing::{
    Calibration, ChannelKalmanFilter, FilterState, KalmanParameters, NonPositivePolicy, ParseError,
    ParsedReadings, ReadingParser, SavitzkyGolay, SignalProcessor,
};
pub use validation::{ProcessingError, ProcessingResult};
pub use utils::{ConfigError, ConfigurationManager, PipelineConfig};
pub use api::{CsvFormatter, JsonFormatter, PlotRenderer, RecordLog, StartSignal};
