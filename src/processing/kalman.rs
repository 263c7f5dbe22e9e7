use crate::core::{
    KALMAN_INITIAL_COVARIANCE, KALMAN_MEASUREMENT_NOISE, KALMAN_PROCESS_NOISE, KALMAN_TIME_STEP,
};
use nalgebra::{Matrix1x2, Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Tuning of the per-channel constant-velocity filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanParameters {
    /// Initial [value, rate] estimate
    pub initial_state: [f64; 2],
    /// Initial covariance is `identity * initial_covariance`
    pub initial_covariance: f64,
    /// Variance of a single voltage observation
    pub measurement_noise: f64,
    /// Process noise is `identity * process_noise`
    pub process_noise: f64,
    /// Step used by the transition matrix
    pub time_step: f64,
}

impl Default for KalmanParameters {
    fn default() -> Self {
        Self {
            initial_state: [0.0, 0.0],
            initial_covariance: KALMAN_INITIAL_COVARIANCE,
            measurement_noise: KALMAN_MEASUREMENT_NOISE,
            process_noise: KALMAN_PROCESS_NOISE,
            time_step: KALMAN_TIME_STEP,
        }
    }
}

/// Filter estimate carried from one sample to the next.
/// State vector: [value, rate]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    pub state: Vector2<f64>,
    pub covariance: Matrix2<f64>,
}

impl FilterState {
    pub fn value(&self) -> f64 {
        self.state[0]
    }

    pub fn rate(&self) -> f64 {
        self.state[1]
    }

    /// Standard deviation of the value estimate
    pub fn value_uncertainty(&self) -> f64 {
        self.covariance[(0, 0)].sqrt()
    }
}

/// Kalman filter for one scalar sensor channel.
///
/// The filter only holds the model matrices; the evolving estimate is an
/// explicit [`FilterState`] passed into and returned from [`step`](Self::step).
#[derive(Debug, Clone)]
pub struct ChannelKalmanFilter {
    transition: Matrix2<f64>,
    observation: Matrix1x2<f64>,
    process_noise: Matrix2<f64>,
    measurement_noise: f64,
    initial: FilterState,
}

impl ChannelKalmanFilter {
    /// Create a filter with the default rig tuning
    pub fn new() -> Self {
        Self::with_parameters(&KalmanParameters::default())
    }

    pub fn with_parameters(params: &KalmanParameters) -> Self {
        Self {
            transition: Self::create_state_transition_matrix(params.time_step),
            observation: Matrix1x2::new(1.0, 0.0),
            process_noise: Matrix2::identity() * params.process_noise,
            measurement_noise: params.measurement_noise,
            initial: FilterState {
                state: Vector2::new(params.initial_state[0], params.initial_state[1]),
                covariance: Matrix2::identity() * params.initial_covariance,
            },
        }
    }

    /// Estimate before any sample has been seen
    pub fn initial_state(&self) -> FilterState {
        self.initial
    }

    /// Advance the estimate one step with the constant-velocity model
    pub fn predict(&self, prior: FilterState) -> FilterState {
        let f = self.transition;
        FilterState {
            state: f * prior.state,
            covariance: f * prior.covariance * f.transpose() + self.process_noise,
        }
    }

    /// Fold one observed voltage into a predicted estimate
    pub fn update(&self, predicted: FilterState, measurement: f64) -> FilterState {
        let h = self.observation;

        let innovation = measurement - (h * predicted.state)[0];
        let s = (h * predicted.covariance * h.transpose())[0] + self.measurement_noise;
        if s == 0.0 || !s.is_finite() {
            return predicted;
        }

        let k: Vector2<f64> = predicted.covariance * h.transpose() / s;
        let state = predicted.state + k * innovation;

        // Joseph form keeps the covariance symmetric positive semi-definite
        let i_kh = Matrix2::identity() - k * h;
        let covariance = i_kh * predicted.covariance * i_kh.transpose()
            + k * k.transpose() * self.measurement_noise;

        FilterState { state, covariance }
    }

    /// Predict then update for one sample
    pub fn step(&self, prior: FilterState, measurement: f64) -> FilterState {
        self.update(self.predict(prior), measurement)
    }

    /// Run a whole series and return the corrected value for every sample
    pub fn filter(&self, measurements: &[f64]) -> Vec<f64> {
        self.filter_with_state(measurements).0
    }

    /// Like [`filter`](Self::filter), also returning the final estimate
    pub fn filter_with_state(&self, measurements: &[f64]) -> (Vec<f64>, FilterState) {
        let mut estimate = self.initial;
        let mut values = Vec::with_capacity(measurements.len());
        for &z in measurements {
            estimate = self.step(estimate, z);
            values.push(estimate.value());
        }
        (values, estimate)
    }

    fn create_state_transition_matrix(dt: f64) -> Matrix2<f64> {
        Matrix2::new(
            1.0, dt,
            0.0, 1.0,
        )
    }
}

impl Default for ChannelKalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}
