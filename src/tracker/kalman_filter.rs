//! Constant-velocity Kalman filter over (cx, cy, aspect, height) boxes.
//!
//! State is 8-dimensional: the box in XYAH form followed by the velocity of
//! each component. Only the first four components are observed.

use ndarray::{Array1, Array2};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KalmanError {
    #[error("projected covariance is not positive-definite")]
    NotPositiveDefinite,
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(1.0 / 20.0, 1.0 / 160.0)
    }
}

impl KalmanFilter {
    pub fn new(std_weight_position: f64, std_weight_velocity: f64) -> Self {
        let ndim = 4;
        let mut motion_mat = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((ndim, 2 * ndim));
        for i in 0..ndim {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            std_weight_position,
            std_weight_velocity,
        }
    }

    /// Create a track state from an unassociated XYAH measurement.
    ///
    /// Velocities start at zero and the covariance is diagonal.
    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(8);
        for i in 0..4 {
            mean[i] = measurement[i];
        }

        let h = measurement[3];
        let std = [
            2.0 * self.std_weight_position * h,
            2.0 * self.std_weight_position * h,
            1e-2,
            2.0 * self.std_weight_position * h,
            10.0 * self.std_weight_velocity * h,
            10.0 * self.std_weight_velocity * h,
            1e-5,
            10.0 * self.std_weight_velocity * h,
        ];

        (mean, diagonal_variance(&std))
    }

    /// Run the prediction step one frame ahead.
    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let std = [
            self.std_weight_position * h,
            self.std_weight_position * h,
            1e-2,
            self.std_weight_position * h,
            self.std_weight_velocity * h,
            self.std_weight_velocity * h,
            1e-5,
            self.std_weight_velocity * h,
        ];
        let motion_cov = diagonal_variance(&std);

        let new_mean = self.motion_mat.dot(mean);
        let new_covariance = self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + motion_cov;

        (new_mean, new_covariance)
    }

    /// Project the state distribution into measurement space.
    pub fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let std = [
            self.std_weight_position * h,
            self.std_weight_position * h,
            1e-1,
            self.std_weight_position * h,
        ];
        let innovation_cov = diagonal_variance(&std);

        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj =
            self.update_mat.dot(covariance).dot(&self.update_mat.t()) + innovation_cov;

        (mean_proj, covariance_proj)
    }

    /// Run the correction step against an XYAH measurement.
    ///
    /// The inputs are left untouched; on failure nothing has been applied.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> Result<(Array1<f64>, Array2<f64>), KalmanError> {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let chol = nalgebra::Matrix4::from_fn(|i, j| projected_cov[[i, j]])
            .cholesky()
            .ok_or(KalmanError::NotPositiveDefinite)?;

        // K = P * H^T * S^-1, obtained as K^T = S^-1 * (P * H^T)^T through the
        // Cholesky factor of S.
        let pht = covariance.dot(&self.update_mat.t());
        let rhs = nalgebra::SMatrix::<f64, 4, 8>::from_fn(|i, j| pht[[j, i]]);
        let gain_t = chol.solve(&rhs);
        let kalman_gain = Array2::from_shape_fn((8, 4), |(i, j)| gain_t[(j, i)]);

        let innovation = Array1::from(measurement.to_vec()) - &projected_mean;

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let new_covariance =
            covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        Ok((new_mean, new_covariance))
    }
}

fn diagonal_variance(std: &[f64]) -> Array2<f64> {
    Array2::from_diag(&Array1::from_iter(std.iter().map(|s| s * s)))
}
