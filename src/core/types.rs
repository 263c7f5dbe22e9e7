//! Core data types for the acquisition pipeline

use serde::{Deserialize, Serialize};

/// One raw sample as recorded by the microcontroller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// IR rangefinder output (V)
    #[serde(rename = "distance_reading")]
    pub distance_voltage: f64,
    /// Potentiometer output (V)
    #[serde(rename = "angle_reading")]
    pub angle_voltage: f64,
    /// Seconds since acquisition start
    #[serde(rename = "time")]
    pub timestamp_seconds: f64,
}

impl Reading {
    pub fn new(distance_voltage: f64, angle_voltage: f64, timestamp_seconds: f64) -> Self {
        Self {
            distance_voltage,
            angle_voltage,
            timestamp_seconds,
        }
    }
}

/// Filtered, converted and differentiated output of one processing run.
///
/// Every series has the same length as the input and is aligned with `time`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub time: Vec<f64>,
    pub distance: Vec<f64>,
    pub distance_velocity: Vec<f64>,
    pub distance_acceleration: Vec<f64>,
    pub angle: Vec<f64>,
    pub angle_velocity: Vec<f64>,
    pub angle_acceleration: Vec<f64>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Panels in plotting order: linear row first, then angular row
    pub fn panels(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("distance", self.distance.as_slice()),
            ("distance_velocity", self.distance_velocity.as_slice()),
            ("distance_acceleration", self.distance_acceleration.as_slice()),
            ("angle", self.angle.as_slice()),
            ("angle_velocity", self.angle_velocity.as_slice()),
            ("angle_acceleration", self.angle_acceleration.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_wire_keys() {
        let reading = Reading::new(1.5, 2.0, 0.25);
        let json = serde_json::to_string(&reading).unwrap();

        assert!(json.contains("\"distance_reading\":1.5"));
        assert!(json.contains("\"angle_reading\":2.0"));
        assert!(json.contains("\"time\":0.25"));
    }

    #[test]
    fn test_panels_order() {
        let series = DerivedSeries {
            time: vec![0.0],
            distance: vec![1.0],
            distance_velocity: vec![2.0],
            distance_acceleration: vec![3.0],
            angle: vec![4.0],
            angle_velocity: vec![5.0],
            angle_acceleration: vec![6.0],
        };

        let values: Vec<f64> = series.panels().iter().map(|(_, s)| s[0]).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(series.len(), 1);
        assert!(!series.is_empty());
    }
}
