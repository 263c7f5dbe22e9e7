use crate::validation::error::{ProcessingError, ProcessingResult};
use nalgebra::DMatrix;

/// Savitzky-Golay smoother: a least-squares polynomial fitted over a sliding
/// window, evaluated at the window centre.
///
/// Near the ends of the series, where no centred window fits, the polynomial
/// fitted to the first (or last) full window is evaluated at each edge sample.
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window_length: usize,
    polyorder: usize,
    /// Hat matrix of the window fit. Row `r` maps the window samples to the
    /// fitted value at window position `r`.
    projection: DMatrix<f64>,
}

impl SavitzkyGolay {
    pub fn new(window_length: usize, polyorder: usize) -> ProcessingResult<Self> {
        if window_length % 2 == 0 {
            return Err(ProcessingError::InvalidParameter {
                parameter: "window_length".to_string(),
                reason: format!("must be odd, got {}", window_length),
            });
        }
        if polyorder >= window_length {
            return Err(ProcessingError::InvalidParameter {
                parameter: "polyorder".to_string(),
                reason: format!("must be less than window_length ({}), got {}", window_length, polyorder),
            });
        }

        let half = window_length / 2;
        let scale = half.max(1) as f64;
        // Positions scaled into [-1, 1] to keep the normal equations well conditioned
        let vandermonde = DMatrix::from_fn(window_length, polyorder + 1, |row, power| {
            let x = (row as f64 - half as f64) / scale;
            x.powi(power as i32)
        });

        let normal = vandermonde.transpose() * &vandermonde;
        let normal_inv = normal.try_inverse().ok_or_else(|| ProcessingError::InvalidParameter {
            parameter: "polyorder".to_string(),
            reason: "window fit is singular".to_string(),
        })?;
        let projection = &vandermonde * normal_inv * vandermonde.transpose();

        Ok(Self {
            window_length,
            polyorder,
            projection,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Convolution weights applied to interior samples
    pub fn coefficients(&self) -> Vec<f64> {
        self.projection.row(self.window_length / 2).iter().copied().collect()
    }

    /// Smooth a series. Output has the same length as the input.
    pub fn smooth(&self, values: &[f64]) -> ProcessingResult<Vec<f64>> {
        let n = values.len();
        let w = self.window_length;
        if n < w {
            return Err(ProcessingError::InsufficientData {
                required: w,
                available: n,
            });
        }

        let half = w / 2;
        let mut smoothed = Vec::with_capacity(n);

        for i in 0..half {
            smoothed.push(self.fit_at(i, &values[..w]));
        }
        for i in half..n - half {
            smoothed.push(self.fit_at(half, &values[i - half..=i + half]));
        }
        let tail = &values[n - w..];
        for i in n - half..n {
            smoothed.push(self.fit_at(i - (n - w), tail));
        }

        Ok(smoothed)
    }

    fn fit_at(&self, row: usize, window: &[f64]) -> f64 {
        self.projection
            .row(row)
            .iter()
            .zip(window)
            .map(|(weight, value)| weight * value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_even_window() {
        assert!(matches!(
            SavitzkyGolay::new(50, 3),
            Err(ProcessingError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_order_not_below_window() {
        assert!(SavitzkyGolay::new(5, 5).is_err());
        assert!(SavitzkyGolay::new(5, 4).is_ok());
    }

    #[test]
    fn test_known_coefficients() {
        // Classic 5-point quadratic weights: (-3, 12, 17, 12, -3) / 35
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0];

        for (c, e) in filter.coefficients().iter().zip(expected.iter()) {
            assert!((c - e / 35.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cubic_preserved_everywhere() {
        let filter = SavitzkyGolay::new(51, 3).unwrap();
        let values: Vec<f64> = (0..120)
            .map(|i| {
                let x = i as f64 * 0.1;
                0.5 * x * x * x - 2.0 * x * x + x + 3.0
            })
            .collect();

        let smoothed = filter.smooth(&values).unwrap();

        assert_eq!(smoothed.len(), values.len());
        for (s, v) in smoothed.iter().zip(values.iter()) {
            assert!((s - v).abs() < 1e-6, "{} vs {}", s, v);
        }
    }

    #[test]
    fn test_window_length_boundary() {
        let filter = SavitzkyGolay::new(51, 3).unwrap();

        let err = filter.smooth(&vec![1.0; 50]).unwrap_err();
        assert_eq!(err, ProcessingError::InsufficientData { required: 51, available: 50 });

        let smoothed = filter.smooth(&vec![1.0; 51]).unwrap();
        assert_eq!(smoothed.len(), 51);
        assert!(smoothed.iter().all(|v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_attenuates_alternating_noise() {
        let filter = SavitzkyGolay::new(51, 3).unwrap();
        let values: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();

        let smoothed = filter.smooth(&values).unwrap();

        for v in &smoothed[25..175] {
            assert!(v.abs() < 0.1);
        }
    }

    #[test]
    fn test_nan_stays_local_to_its_windows() {
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let mut values = vec![1.0; 30];
        values[15] = f64::NAN;

        let smoothed = filter.smooth(&values).unwrap();

        assert!(smoothed[15].is_nan());
        assert!(smoothed[13].is_nan() && smoothed[17].is_nan());
        assert!(smoothed[12].is_finite() && smoothed[18].is_finite());
    }
}
