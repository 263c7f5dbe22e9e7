//! Voltage to physical unit conversion for the two sensor channels

use crate::core::{
    ANGLE_SCALE_DEGREES, ANGLE_VOLTAGE_MAX, DEFAULT_CLAMP_EPSILON, DISTANCE_POWER, DISTANCE_SCALE,
};
use serde::{Deserialize, Serialize};

/// What to do with a filtered distance voltage that is zero or negative,
/// where the power-law response is undefined
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NonPositivePolicy {
    /// Emit NaN; the gap propagates through smoothing and derivatives
    #[default]
    Propagate,
    /// Raise the voltage to `epsilon` before the transform
    Clamp { epsilon: f64 },
}

impl NonPositivePolicy {
    pub fn clamp_default() -> Self {
        NonPositivePolicy::Clamp {
            epsilon: DEFAULT_CLAMP_EPSILON,
        }
    }
}

/// Sensor calibration, fixed for the duration of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub angle_voltage_max: f64,
    pub angle_scale_degrees: f64,
    pub distance_power: f64,
    pub distance_scale: f64,
    pub non_positive_policy: NonPositivePolicy,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            angle_voltage_max: ANGLE_VOLTAGE_MAX,
            angle_scale_degrees: ANGLE_SCALE_DEGREES,
            distance_power: DISTANCE_POWER,
            distance_scale: DISTANCE_SCALE,
            non_positive_policy: NonPositivePolicy::default(),
        }
    }
}

impl Calibration {
    /// Potentiometer voltage to degrees (linear)
    pub fn angle_degrees(&self, voltage: f64) -> f64 {
        voltage / self.angle_voltage_max * self.angle_scale_degrees
    }

    /// Rangefinder voltage to distance (power law)
    pub fn distance(&self, voltage: f64) -> f64 {
        let voltage = match self.non_positive_policy {
            _ if voltage > 0.0 => voltage,
            NonPositivePolicy::Propagate => return f64::NAN,
            NonPositivePolicy::Clamp { epsilon } => epsilon,
        };
        self.distance_scale * voltage.powf(self.distance_power)
    }

    pub fn convert_angles(&self, voltages: &[f64]) -> Vec<f64> {
        voltages.iter().map(|&v| self.angle_degrees(v)).collect()
    }

    /// Convert a distance series. Also returns how many samples were
    /// non-positive, i.e. hit the policy.
    pub fn convert_distances(&self, voltages: &[f64]) -> (Vec<f64>, usize) {
        let out_of_domain = voltages.iter().filter(|&&v| !(v > 0.0)).count();
        let distances = voltages.iter().map(|&v| self.distance(v)).collect();
        (distances, out_of_domain)
    }
}
