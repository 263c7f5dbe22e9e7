//! Numerical differentiation on unevenly spaced samples

use crate::validation::error::{ProcessingError, ProcessingResult};

/// Derivative of `values` with respect to `times`.
///
/// Interior points use the second-order central difference for non-uniform
/// spacing; the first and last points use one-sided first-order differences.
/// NaN samples propagate to their neighbours.
pub fn gradient(values: &[f64], times: &[f64]) -> ProcessingResult<Vec<f64>> {
    if values.len() != times.len() {
        return Err(ProcessingError::InvalidParameter {
            parameter: "times".to_string(),
            reason: format!("length {} does not match {} values", times.len(), values.len()),
        });
    }
    let n = values.len();
    if n < 2 {
        return Err(ProcessingError::InsufficientData {
            required: 2,
            available: n,
        });
    }

    let steps = time_steps(times)?;
    let mut derivative = Vec::with_capacity(n);

    derivative.push((values[1] - values[0]) / steps[0]);
    for i in 1..n - 1 {
        let hd = steps[i - 1];
        let hs = steps[i];
        if hd + hs == 0.0 {
            return Err(ProcessingError::DegenerateSpacing { index: i });
        }
        let d = (hd * hd * values[i + 1] - hs * hs * values[i - 1] + (hs * hs - hd * hd) * values[i])
            / (hs * hd * (hd + hs));
        derivative.push(d);
    }
    derivative.push((values[n - 1] - values[n - 2]) / steps[n - 2]);

    Ok(derivative)
}

/// Consecutive time deltas. A zero delta makes every derivative touching it
/// undefined, so it is reported instead of producing infinities.
pub fn time_steps(times: &[f64]) -> ProcessingResult<Vec<f64>> {
    times
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let dt = pair[1] - pair[0];
            if dt == 0.0 {
                Err(ProcessingError::DuplicateTimestamp {
                    index: i + 1,
                    time: pair[1],
                })
            } else {
                Ok(dt)
            }
        })
        .collect()
}
