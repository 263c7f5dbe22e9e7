//! Signal processing stages

pub mod calibration;
pub mod derivative;
pub mod kalman;
pub mod parser;
pub mod pipeline;
pub mod savgol;

pub use calibration::{Calibration, NonPositivePolicy};
pub use kalman::{ChannelKalmanFilter, FilterState, KalmanParameters};
pub use parser::{ParseError, ParsedReadings, ReadingParser};
pub use pipeline::SignalProcessor;
pub use savgol::SavitzkyGolay;
