use crate::core::{DEFAULT_DATA_PATH, DEFAULT_PLOT_PATH, SAVGOL_POLYORDER, SAVGOL_WINDOW};
use crate::processing::calibration::{Calibration, NonPositivePolicy};
use crate::processing::kalman::KalmanParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Complete configuration of one processing run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sensor calibration constants
    pub calibration: Calibration,
    /// Per-channel Kalman tuning (shared by both channels)
    pub kalman: KalmanParameters,
    /// Savitzky-Golay settings
    pub smoothing: SmoothingConfig,
    /// Where the raw records live and where artifacts go
    pub output: OutputConfig,
}

/// Savitzky-Golay smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Window length in samples (odd). Also the minimum dataset size.
    pub window_length: usize,
    /// Order of the fitted polynomial
    pub polyorder: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_length: SAVGOL_WINDOW,
            polyorder: SAVGOL_POLYORDER,
        }
    }
}

/// Well-known file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only raw record log
    pub data_path: String,
    /// Rendered plot
    pub plot_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            plot_path: DEFAULT_PLOT_PATH.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid value {} for '{}': {}", value, parameter, reason)
            }
            ConfigError::IoError { message } => write!(f, "Configuration I/O error: {}", message),
            ConfigError::SerializationError { message } => write!(f, "Configuration format error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Loads, validates and stores the pipeline configuration
pub struct ConfigurationManager {
    config: PipelineConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn into_config(self) -> PipelineConfig {
        self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: PipelineConfig) -> Result<(), ConfigError> {
        Self::first_error(self.validate_config(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file. Missing sections keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        Self::first_error(self.validate_config(&config))?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Path of the file the configuration was last loaded from or saved to
    pub fn file_path(&self) -> Option<&str> {
        self.config_file_path.as_deref()
    }

    /// Validate a configuration without applying it
    pub fn validate_config(&self, config: &PipelineConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let mut positive = |parameter: &str, value: f64| {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "must be a positive finite number".to_string(),
                });
            }
        };

        let calibration = &config.calibration;
        positive("calibration.angle_voltage_max", calibration.angle_voltage_max);
        positive("calibration.angle_scale_degrees", calibration.angle_scale_degrees);
        positive("calibration.distance_scale", calibration.distance_scale);
        if let NonPositivePolicy::Clamp { epsilon } = calibration.non_positive_policy {
            positive("calibration.non_positive_policy.epsilon", epsilon);
        }

        let kalman = &config.kalman;
        positive("kalman.initial_covariance", kalman.initial_covariance);
        positive("kalman.measurement_noise", kalman.measurement_noise);
        positive("kalman.process_noise", kalman.process_noise);
        positive("kalman.time_step", kalman.time_step);

        if !calibration.distance_power.is_finite() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "calibration.distance_power".to_string(),
                value: calibration.distance_power.to_string(),
                reason: "must be finite".to_string(),
            });
        } else if calibration.distance_power >= 0.0 {
            warnings.push(format!(
                "calibration.distance_power is {}; IR rangefinders usually have a negative exponent",
                calibration.distance_power
            ));
        }

        if kalman.initial_state.iter().any(|v| !v.is_finite()) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "kalman.initial_state".to_string(),
                value: format!("{:?}", kalman.initial_state),
                reason: "must be finite".to_string(),
            });
        }

        let smoothing = &config.smoothing;
        if smoothing.window_length < 3 || smoothing.window_length % 2 == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "smoothing.window_length".to_string(),
                value: smoothing.window_length.to_string(),
                reason: "must be an odd number of at least 3".to_string(),
            });
        }
        if smoothing.polyorder >= smoothing.window_length {
            errors.push(ConfigError::InvalidParameter {
                parameter: "smoothing.polyorder".to_string(),
                value: smoothing.polyorder.to_string(),
                reason: format!("must be less than window_length ({})", smoothing.window_length),
            });
        }

        if config.output.plot_path.is_empty() || config.output.data_path.is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "output".to_string(),
                value: "\"\"".to_string(),
                reason: "paths must not be empty".to_string(),
            });
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub(crate) fn first_error(validation: ValidationResult) -> Result<(), ConfigError> {
        for warning in &validation.warnings {
            log::warn!("{}", warning);
        }
        match validation.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}
