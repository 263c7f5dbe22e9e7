use crate::core::{DerivedSeries, Reading};
use crate::processing::derivative::gradient;
use crate::processing::kalman::ChannelKalmanFilter;
use crate::processing::parser::{ParsedReadings, ReadingParser};
use crate::processing::savgol::SavitzkyGolay;
use crate::utils::config::{ConfigurationManager, PipelineConfig};
use crate::validation::data::{ReadingValidator, TimestampValidator};
use crate::validation::error::{ProcessingError, ProcessingResult};
use log::{debug, info, warn};
use std::path::Path;

/// Offline batch processor turning raw sensor voltages into distance, angle
/// and their first and second time derivatives.
///
/// Stages, in order: length check, voltage and timestamp validation, Kalman filtering of
/// both voltage channels, unit conversion, Savitzky-Golay smoothing, then
/// differentiation against the recorded timestamps. Each run starts from a
/// fresh filter state; nothing carries over between calls.
#[derive(Debug, Clone)]
pub struct SignalProcessor {
    config: PipelineConfig,
    filter: ChannelKalmanFilter,
    smoother: SavitzkyGolay,
}

impl SignalProcessor {
    /// Build a processor. The configuration goes through the same validation
    /// as a configuration file.
    pub fn new(config: PipelineConfig) -> ProcessingResult<Self> {
        ConfigurationManager::first_error(ConfigurationManager::new().validate_config(&config))?;
        let filter = ChannelKalmanFilter::with_parameters(&config.kalman);
        let smoother = SavitzkyGolay::new(config.smoothing.window_length, config.smoothing.polyorder)?;
        Ok(Self {
            config,
            filter,
            smoother,
        })
    }

    /// Smallest dataset the pipeline accepts
    pub fn min_samples(&self) -> usize {
        self.smoother.window_length()
    }

    /// Run the whole pipeline over an ordered set of readings
    pub fn process(&self, readings: &[Reading]) -> ProcessingResult<DerivedSeries> {
        let required = self.min_samples();
        if readings.len() < required {
            return Err(ProcessingError::InsufficientData {
                required,
                available: readings.len(),
            });
        }
        info!("Processing {} readings", readings.len());

        ReadingValidator::new().validate(readings)?;
        let time: Vec<f64> = readings.iter().map(|r| r.timestamp_seconds).collect();
        let report = TimestampValidator::new().validate(&time)?;
        debug!(
            "Checked {} timestamps: min step {:?} s, max step {:?} s",
            report.samples, report.min_step, report.max_step
        );

        let distance_voltage: Vec<f64> = readings.iter().map(|r| r.distance_voltage).collect();
        let angle_voltage: Vec<f64> = readings.iter().map(|r| r.angle_voltage).collect();

        // Two independent filters with identical tuning
        let filtered_distance = self.filter.filter(&distance_voltage);
        let filtered_angle = self.filter.filter(&angle_voltage);

        let calibration = &self.config.calibration;
        let (distance, out_of_domain) = calibration.convert_distances(&filtered_distance);
        if out_of_domain > 0 {
            warn!(
                "{} filtered distance voltage(s) were not positive; policy {:?} applied",
                out_of_domain, calibration.non_positive_policy
            );
        }
        let angle = calibration.convert_angles(&filtered_angle);

        let distance = self.smoother.smooth(&distance)?;
        let angle = self.smoother.smooth(&angle)?;

        let distance_velocity = gradient(&distance, &time)?;
        let distance_acceleration = gradient(&distance_velocity, &time)?;
        let angle_velocity = gradient(&angle, &time)?;
        let angle_acceleration = gradient(&angle_velocity, &time)?;

        let series = DerivedSeries {
            time,
            distance,
            distance_velocity,
            distance_acceleration,
            angle,
            angle_velocity,
            angle_acceleration,
        };

        let non_finite = series
            .panels()
            .iter()
            .map(|(_, values)| values.iter().filter(|v| !v.is_finite()).count())
            .sum::<usize>();
        if non_finite > 0 {
            warn!("Derived series contain {} non-finite sample(s)", non_finite);
        }
        info!("Processed {} samples", series.len());

        Ok(series)
    }

    /// Parse a record file, skipping malformed lines, then process it
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> ProcessingResult<DerivedSeries> {
        let parsed = Self::load(path)?;
        self.process(&parsed.readings)
    }

    /// Parse a record file with the lenient parser
    pub fn load<P: AsRef<Path>>(path: P) -> ProcessingResult<ParsedReadings> {
        let path = path.as_ref();
        let parsed = ReadingParser::new().parse_file(path)?;

        if !parsed.skipped.is_empty() {
            warn!(
                "Skipped {} malformed line(s) in {}",
                parsed.skipped.len(),
                path.display()
            );
        }
        info!("Loaded {} readings from {}", parsed.readings.len(), path.display());
        Ok(parsed)
    }
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            filter: ChannelKalmanFilter::new(),
            smoother: SavitzkyGolay::new(crate::core::SAVGOL_WINDOW, crate::core::SAVGOL_POLYORDER)
                .expect("default smoothing parameters are valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::calibration::NonPositivePolicy;

    /// Slowly swinging arm with a little deterministic jitter
    fn create_test_readings(n: usize) -> Vec<Reading> {
        (0..n)
            .map(|i| {
                let t = i as f64 * 0.05 + if i % 3 == 0 { 0.004 } else { 0.0 };
                let jitter = ((i * 7919) % 13) as f64 * 0.002;
                Reading::new(
                    1.5 + 0.3 * (t * 0.8).sin() + jitter,
                    1.6 + 0.5 * (t * 0.5).cos() - jitter,
                    t,
                )
            })
            .collect()
    }

    #[test]
    fn test_output_lengths_match_input() {
        let processor = SignalProcessor::default();
        let readings = create_test_readings(200);

        let series = processor.process(&readings).unwrap();

        assert_eq!(series.len(), 200);
        for (name, values) in series.panels() {
            assert_eq!(values.len(), 200, "{}", name);
            assert!(values.iter().all(|v| v.is_finite()), "{}", name);
        }
    }

    #[test]
    fn test_timestamps_carried_through() {
        let processor = SignalProcessor::default();
        let readings = create_test_readings(80);

        let series = processor.process(&readings).unwrap();

        let expected: Vec<f64> = readings.iter().map(|r| r.timestamp_seconds).collect();
        assert_eq!(series.time, expected);
    }

    #[test]
    fn test_window_boundary() {
        let processor = SignalProcessor::default();

        let err = processor.process(&create_test_readings(50)).unwrap_err();
        assert_eq!(err, ProcessingError::InsufficientData { required: 51, available: 50 });

        let series = processor.process(&create_test_readings(51)).unwrap();
        assert_eq!(series.len(), 51);
    }

    #[test]
    fn test_empty_input() {
        let processor = SignalProcessor::default();
        assert!(matches!(
            processor.process(&[]),
            Err(ProcessingError::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn test_reprocessing_is_bit_identical() {
        let processor = SignalProcessor::default();
        let readings = create_test_readings(120);

        let first = processor.process(&readings).unwrap();
        let second = processor.process(&readings).unwrap();

        for ((_, a), (_, b)) in first.panels().iter().zip(second.panels().iter()) {
            let a: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
            let b: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_constant_voltages_give_flat_tail() {
        let processor = SignalProcessor::default();
        let readings: Vec<Reading> = (0..300).map(|i| Reading::new(1.0, 1.665, i as f64 * 0.1)).collect();

        let series = processor.process(&readings).unwrap();

        let last = series.len() - 1;
        assert!((series.distance[last] - 20.1).abs() < 1e-3);
        assert!((series.angle[last] - 166.65).abs() < 1e-3);
        assert!(series.distance_velocity[last].abs() < 1e-3);
        assert!(series.angle_velocity[last].abs() < 1e-3);
    }

    #[test]
    fn test_duplicate_timestamp_aborts() {
        let processor = SignalProcessor::default();
        let mut readings = create_test_readings(60);
        readings[10].timestamp_seconds = readings[9].timestamp_seconds;

        assert!(matches!(
            processor.process(&readings),
            Err(ProcessingError::DuplicateTimestamp { index: 10, .. })
        ));
    }

    #[test]
    fn test_non_positive_voltage_propagates_nan() {
        let processor = SignalProcessor::default();
        let readings: Vec<Reading> = (0..100)
            .map(|i| Reading::new(-0.5, 1.0, i as f64 * 0.1))
            .collect();

        let series = processor.process(&readings).unwrap();

        assert_eq!(series.len(), 100);
        assert!(series.distance.iter().all(|v| v.is_nan()));
        assert!(series.angle.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_non_positive_stretch_only_blanks_its_neighbourhood() {
        let processor = SignalProcessor::default();
        let readings: Vec<Reading> = (0..300)
            .map(|i| {
                let distance = if (150..155).contains(&i) { -4.0 } else { 1.0 };
                Reading::new(distance, 1.6, i as f64 * 0.1)
            })
            .collect();

        let series = processor.process(&readings).unwrap();
        assert_eq!(series.len(), 300);

        // Filtered voltage is non-positive on samples 150..=155; smoothing
        // widens that by half a window, each derivative by one more sample.
        let nan_ranges = [
            (&series.distance, 125..=180),
            (&series.distance_velocity, 124..=181),
            (&series.distance_acceleration, 123..=182),
        ];
        for (values, nan) in nan_ranges {
            for (i, v) in values.iter().enumerate() {
                if nan.contains(&i) {
                    assert!(v.is_nan(), "sample {} should be NaN", i);
                } else {
                    assert!(v.is_finite(), "sample {} should be finite", i);
                }
            }
        }
        assert!(series.angle.iter().all(|v| v.is_finite()));
        assert!(series.angle_acceleration.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_non_finite_voltage_aborts() {
        let processor = SignalProcessor::default();
        let mut readings = create_test_readings(80);
        readings[5].angle_voltage = f64::INFINITY;

        assert!(matches!(
            processor.process(&readings),
            Err(ProcessingError::InvalidParameter { ref parameter, .. }) if parameter == "angle_reading"
        ));

        readings[5].angle_voltage = 1.6;
        readings[40].distance_voltage = f64::NAN;
        assert!(matches!(
            processor.process(&readings),
            Err(ProcessingError::InvalidParameter { ref parameter, .. }) if parameter == "distance_reading"
        ));
    }

    #[test]
    fn test_invalid_filter_config_rejected() {
        let mut config = PipelineConfig::default();
        config.kalman.measurement_noise = 0.0;
        assert!(matches!(
            SignalProcessor::new(config),
            Err(ProcessingError::InvalidParameter { ref parameter, .. }) if parameter == "kalman.measurement_noise"
        ));

        let mut config = PipelineConfig::default();
        config.kalman.time_step = -1.0;
        assert!(matches!(
            SignalProcessor::new(config),
            Err(ProcessingError::InvalidParameter { ref parameter, .. }) if parameter == "kalman.time_step"
        ));
    }

    #[test]
    fn test_non_positive_voltage_clamped() {
        let mut config = PipelineConfig::default();
        config.calibration.non_positive_policy = NonPositivePolicy::clamp_default();
        let processor = SignalProcessor::new(config).unwrap();
        let readings: Vec<Reading> = (0..100)
            .map(|i| Reading::new(-0.5, 1.0, i as f64 * 0.1))
            .collect();

        let series = processor.process(&readings).unwrap();

        assert!(series.distance.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_invalid_smoothing_config() {
        let mut config = PipelineConfig::default();
        config.smoothing.window_length = 10;

        assert!(SignalProcessor::new(config).is_err());
    }
}
