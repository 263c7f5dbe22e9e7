//! Integration tests for the processing pipeline
//!
//! Covers the file-based flow: record log on disk, lenient parsing, the full
//! filter/smooth/differentiate pipeline, and the rendered artifacts.

use proptest::prelude::*;
use rangefinder::{
    CsvFormatter, PlotRenderer, ProcessingError, Reading, RecordLog, SignalProcessor,
};
use std::fs;
use tempfile::tempdir;

fn create_run(n: usize) -> Vec<Reading> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.04 + (i % 4) as f64 * 0.003;
            Reading::new(1.2 + 0.2 * (t * 1.3).sin(), 1.4 + 0.6 * (t * 0.7).sin(), t)
        })
        .collect()
}

#[test]
fn test_corrupted_line_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("received_sensor_readings.json");
    let log = RecordLog::new(&path);
    let readings = create_run(60);
    log.append_all(&readings[..25]).unwrap();

    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("{\"distance_reading\": 1.3, \"angle_rea\n");
    fs::write(&path, content).unwrap();
    log.append_all(&readings[25..]).unwrap();

    let series = SignalProcessor::default().process_file(&path).unwrap();

    assert_eq!(series.len(), 60);
    assert_eq!(series.distance.len(), 60);
    assert_eq!(series.angle_acceleration.len(), 60);
}

#[test]
fn test_reprocessing_same_file_is_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");
    RecordLog::new(&path).append_all(&create_run(150)).unwrap();

    let processor = SignalProcessor::default();
    let first = processor.process_file(&path).unwrap();
    let second = processor.process_file(&path).unwrap();

    let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    for ((name, a), (_, b)) in first.panels().iter().zip(second.panels().iter()) {
        assert_eq!(bits(*a), bits(*b), "{}", name);
    }
}

#[test]
fn test_short_file_fails_without_plot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");
    let plot = dir.path().join("static").join("plot.svg");
    RecordLog::new(&path).append_all(&create_run(50)).unwrap();

    let result = SignalProcessor::default().process_file(&path);

    assert_eq!(
        result.unwrap_err(),
        ProcessingError::InsufficientData { required: 51, available: 50 }
    );
    assert!(!plot.exists());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = SignalProcessor::default().process_file(dir.path().join("absent.json"));

    assert!(matches!(result, Err(ProcessingError::Io { .. })));
}

#[test]
fn test_end_to_end_artifacts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");
    let plot = dir.path().join("static").join("plot.svg");
    let csv = dir.path().join("run.csv");
    let log = RecordLog::new(&path);
    log.append_all(&create_run(120)).unwrap();

    let series = SignalProcessor::default().process_file(&path).unwrap();
    PlotRenderer::new().write_to(&series, &plot).unwrap();
    CsvFormatter::new().write_to(&series, &csv).unwrap();

    let svg = fs::read_to_string(&plot).unwrap();
    assert!(svg.contains("Distance vs Time"));
    assert!(svg.contains("Angular Acceleration vs Time"));
    assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 121);

    log.clear(&plot).unwrap();
    assert!(!plot.exists());
    assert!(log.read().unwrap().readings.is_empty());
}

proptest! {
    #[test]
    fn prop_output_length_matches_input(
        samples in prop::collection::vec((0.5f64..3.0, 0.0f64..3.3, 0.01f64..0.2), 51..160)
    ) {
        let mut t = 0.0;
        let readings: Vec<Reading> = samples
            .iter()
            .map(|&(distance, angle, dt)| {
                t += dt;
                Reading::new(distance, angle, t)
            })
            .collect();

        let series = SignalProcessor::default().process(&readings).unwrap();

        prop_assert_eq!(series.len(), readings.len());
        for (_, values) in series.panels() {
            prop_assert_eq!(values.len(), readings.len());
        }
    }
}
