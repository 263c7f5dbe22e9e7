//! Calibration constants and pipeline defaults

/// Full-scale voltage of the angle potentiometer (V)
pub const ANGLE_VOLTAGE_MAX: f64 = 3.33;

/// Mechanical travel of the angle potentiometer at full-scale voltage (degrees)
pub const ANGLE_SCALE_DEGREES: f64 = 333.3;

/// Exponent of the IR rangefinder power-law response
pub const DISTANCE_POWER: f64 = -1.19;

/// Scale of the IR rangefinder power-law response
pub const DISTANCE_SCALE: f64 = 20.1;

/// Savitzky-Golay window length (samples, odd)
pub const SAVGOL_WINDOW: usize = 51;

/// Savitzky-Golay polynomial order
pub const SAVGOL_POLYORDER: usize = 3;

/// Initial diagonal of the Kalman state covariance
pub const KALMAN_INITIAL_COVARIANCE: f64 = 1000.0;

/// Kalman measurement noise variance (V^2)
pub const KALMAN_MEASUREMENT_NOISE: f64 = 5.0;

/// Diagonal of the Kalman process noise covariance
pub const KALMAN_PROCESS_NOISE: f64 = 1.0;

/// Transition step of the constant-velocity model. One step per sample.
pub const KALMAN_TIME_STEP: f64 = 1.0;

/// Default clamp floor for non-positive distance voltages (V)
pub const DEFAULT_CLAMP_EPSILON: f64 = 1e-3;

/// Raw record log written by the upload handler
pub const DEFAULT_DATA_PATH: &str = "received_sensor_readings.json";

/// Rendered plot picked up by the presentation layer
pub const DEFAULT_PLOT_PATH: &str = "static/plot.svg";
