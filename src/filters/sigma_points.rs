//! Augmented sigma point generation
//!
//! The state is augmented with the two zero-mean process noise terms
//! (longitudinal and yaw acceleration) so the nonlinear motion model sees
//! the noise directly instead of through an additive Q.

use nalgebra::Cholesky;

use crate::error::{UkfError, UkfResult};
use crate::types::{
    AugMat, AugSigmaPoints, AugVec, SigmaWeights, StateMat, StateVec, AUG_DIM, SIGMA_COUNT,
    STATE_DIM,
};

/// Unscented transform constants, computed once per filter instance.
#[derive(Clone, Debug)]
pub struct UkfParams {
    /// Spread parameter λ = 3 - n_aug
    pub lambda: f64,
    /// Scale applied to the square-root columns, √(λ + n_aug)
    pub gamma: f64,
    /// Weights shared by mean and covariance recombination
    pub weights: SigmaWeights,
}

impl UkfParams {
    pub fn new() -> Self {
        let n_aug = AUG_DIM as f64;
        let lambda = 3.0 - n_aug;
        let gamma = (lambda + n_aug).sqrt();

        let mut weights = SigmaWeights::from_element(0.5 / (lambda + n_aug));
        weights[0] = lambda / (lambda + n_aug);

        Self {
            lambda,
            gamma,
            weights,
        }
    }
}

impl Default for UkfParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the augmented mean and covariance.
pub fn augment(x: &StateVec, p: &StateMat, std_a: f64, std_yawdd: f64) -> (AugVec, AugMat) {
    let mut x_aug = AugVec::zeros();
    x_aug.fixed_rows_mut::<STATE_DIM>(0).copy_from(x);

    let mut p_aug = AugMat::zeros();
    p_aug
        .fixed_view_mut::<STATE_DIM, STATE_DIM>(0, 0)
        .copy_from(p);
    p_aug[(STATE_DIM, STATE_DIM)] = std_a * std_a;
    p_aug[(STATE_DIM + 1, STATE_DIM + 1)] = std_yawdd * std_yawdd;

    (x_aug, p_aug)
}

/// Generate the 2·n_aug + 1 augmented sigma points as matrix columns.
///
/// Fails with [`UkfError::NotPositiveDefinite`] when the Cholesky
/// factorization of the augmented covariance does not exist.
pub fn generate_sigma_points(
    x_aug: &AugVec,
    p_aug: &AugMat,
    params: &UkfParams,
) -> UkfResult<AugSigmaPoints> {
    // P_aug = L * L^T
    let l = Cholesky::new(*p_aug)
        .ok_or(UkfError::NotPositiveDefinite)?
        .l();

    let mut sigmas = AugSigmaPoints::zeros();
    sigmas.set_column(0, x_aug);
    for i in 0..AUG_DIM {
        let offset = l.column(i) * params.gamma;
        sigmas.set_column(i + 1, &(x_aug + &offset));
        sigmas.set_column(i + 1 + AUG_DIM, &(x_aug - &offset));
    }

    debug_assert_eq!(sigmas.ncols(), SIGMA_COUNT);
    Ok(sigmas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[rustfmt::skip]
    fn sample_state() -> (StateVec, StateMat) {
        let x = StateVec::new(5.7441, 1.3800, 2.2049, 0.5015, 0.3528);
        let p = StateMat::from_row_slice(&[
            0.0043, -0.0013, 0.0030, -0.0022, -0.0020,
            -0.0013, 0.0077, 0.0011, 0.0071, 0.0060,
            0.0030, 0.0011, 0.0054, 0.0007, 0.0008,
            -0.0022, 0.0071, 0.0007, 0.0098, 0.0100,
            -0.0020, 0.0060, 0.0008, 0.0100, 0.0123,
        ]);
        (x, p)
    }

    #[test]
    fn test_weights_sum_to_one() {
        let params = UkfParams::new();
        assert_relative_eq!(params.weights.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(params.lambda, -4.0);
        assert_relative_eq!(params.weights[0], -4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(params.weights[1], 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_augmentation_layout() {
        let (x, p) = sample_state();
        let (x_aug, p_aug) = augment(&x, &p, 0.2, 0.2);

        assert_eq!(x_aug[5], 0.0);
        assert_eq!(x_aug[6], 0.0);
        assert_relative_eq!(p_aug[(5, 5)], 0.04, epsilon = 1e-12);
        assert_relative_eq!(p_aug[(6, 6)], 0.04, epsilon = 1e-12);
        assert_eq!(p_aug[(5, 6)], 0.0);
        assert_eq!(p_aug[(0, 5)], 0.0);
        assert_eq!(p_aug.fixed_view::<5, 5>(0, 0), p);
    }

    #[test]
    fn test_sigma_points_reproduce_mean_and_covariance() {
        let (x, p) = sample_state();
        let params = UkfParams::new();
        let (x_aug, p_aug) = augment(&x, &p, 0.2, 0.2);
        let sigmas = generate_sigma_points(&x_aug, &p_aug, &params).unwrap();

        let mean = sigmas * params.weights;
        assert_relative_eq!(mean, x_aug, epsilon = 1e-12);

        let mut cov = AugMat::zeros();
        for (i, col) in sigmas.column_iter().enumerate() {
            let d = col - mean;
            cov += params.weights[i] * d * d.transpose();
        }
        assert_relative_eq!(cov, p_aug, epsilon = 1e-12);
    }

    #[test]
    fn test_known_sigma_point_column() {
        let (x, p) = sample_state();
        let params = UkfParams::new();
        let (x_aug, p_aug) = augment(&x, &p, 0.2, 0.2);
        let sigmas = generate_sigma_points(&x_aug, &p_aug, &params).unwrap();

        // first column of L is P[:,0] / sqrt(P[0,0])
        let expected_px = 5.7441 + 3f64.sqrt() * 0.0043f64.sqrt();
        assert_relative_eq!(sigmas[(0, 1)], expected_px, epsilon = 1e-9);
        assert_relative_eq!(sigmas[(0, 8)], 2.0 * 5.7441 - expected_px, epsilon = 1e-9);
        // noise directions only move the noise rows
        assert_relative_eq!(sigmas[(5, 6)], 3f64.sqrt() * 0.2, epsilon = 1e-12);
        assert_relative_eq!(sigmas[(0, 6)], 5.7441, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_definite_rejected() {
        let x = StateVec::zeros();
        let mut p = StateMat::identity();
        p[(2, 2)] = -1.0;
        let (x_aug, p_aug) = augment(&x, &p, 1.0, 1.0);
        let result = generate_sigma_points(&x_aug, &p_aug, &UkfParams::new());
        assert_eq!(result.unwrap_err(), UkfError::NotPositiveDefinite);
    }
}
