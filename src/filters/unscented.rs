//! Unscented transform recombination and the sensor-agnostic update

use nalgebra::{SMatrix, SVector};

use super::angle::normalize_angle;
use super::measurement::MeasurementModel;
use crate::error::{UkfError, UkfResult};
use crate::types::{PredictedSigmaPoints, SigmaWeights, StateMat, StateVec, STATE_DIM, YAW_INDEX};

/// Outcome of one measurement update.
#[derive(Clone, Debug)]
pub struct InnovationReport<const NZ: usize> {
    /// z - z_pred, angle-wrapped where the model has an angular component
    pub innovation: SVector<f64, NZ>,
    /// Innovation covariance S (including R)
    pub covariance: SMatrix<f64, NZ, NZ>,
    /// Normalized innovation squared y^T S^-1 y
    pub nis: f64,
}

/// Difference between a propagated sigma point and the mean with heading wrapped.
fn state_residual(sigma: &StateVec, mean: &StateVec) -> StateVec {
    let mut d = sigma - mean;
    d[YAW_INDEX] = normalize_angle(d[YAW_INDEX]);
    d
}

fn measurement_residual<const NZ: usize>(
    z: &SVector<f64, NZ>,
    z_pred: &SVector<f64, NZ>,
    angle_index: Option<usize>,
) -> SVector<f64, NZ> {
    let mut d = z - z_pred;
    if let Some(i) = angle_index {
        d[i] = normalize_angle(d[i]);
    }
    d
}

/// Recombine propagated sigma points into a predicted mean and covariance.
pub fn recombine_state(
    sigmas: &PredictedSigmaPoints,
    weights: &SigmaWeights,
) -> (StateVec, StateMat) {
    let mut x = sigmas * weights;

    let mut p = StateMat::zeros();
    for (i, col) in sigmas.column_iter().enumerate() {
        let d = state_residual(&col.into_owned(), &x);
        p += weights[i] * d * d.transpose();
    }

    x[YAW_INDEX] = normalize_angle(x[YAW_INDEX]);
    (x, p)
}

/// Correct `x` and `p` with measurement `z` through the unscented transform.
///
/// Every sigma point is projected before anything is mutated, so a model
/// failure or a singular innovation covariance leaves the state untouched.
pub fn unscented_update<const NZ: usize, M: MeasurementModel<NZ>>(
    x: &mut StateVec,
    p: &mut StateMat,
    sigmas: &PredictedSigmaPoints,
    weights: &SigmaWeights,
    model: &M,
    z: &SVector<f64, NZ>,
) -> UkfResult<InnovationReport<NZ>> {
    let angle_index = model.angle_index();

    // 1. Transform sigma points into measurement space
    let z_sigmas = sigmas
        .column_iter()
        .map(|col| model.observe(&col.into_owned()))
        .collect::<UkfResult<Vec<SVector<f64, NZ>>>>()?;

    // 2. Predicted measurement mean
    let z_pred = z_sigmas
        .iter()
        .zip(weights.iter())
        .fold(SVector::<f64, NZ>::zeros(), |acc, (z_sig, w)| acc + z_sig * *w);

    // 3. Innovation covariance S and 4. cross-correlation Tc
    let mut s = SMatrix::<f64, NZ, NZ>::zeros();
    let mut tc = SMatrix::<f64, STATE_DIM, NZ>::zeros();
    for (i, (col, z_sig)) in sigmas.column_iter().zip(z_sigmas.iter()).enumerate() {
        let dz = measurement_residual(z_sig, &z_pred, angle_index);
        let dx = state_residual(&col.into_owned(), x);
        s += weights[i] * dz * dz.transpose();
        tc += weights[i] * dx * dz.transpose();
    }
    s += model.noise();

    // 5. Kalman gain
    let s_inv = s.try_inverse().ok_or(UkfError::SingularInnovation)?;
    let k = tc * s_inv;

    // 6. Innovation
    let y = measurement_residual(z, &z_pred, angle_index);
    let nis = (y.transpose() * s_inv * y)[(0, 0)];

    // 7. Correct mean and covariance
    *x += k * y;
    *p -= k * s * k.transpose();
    let p_t = p.transpose();
    *p = (*p + p_t) * 0.5;

    // 8. Keep heading wrapped
    x[YAW_INDEX] = normalize_angle(x[YAW_INDEX]);

    log::trace!("innovation {:?} nis {:.4}", y.as_slice(), nis);

    Ok(InnovationReport {
        innovation: y,
        covariance: s,
        nis,
    })
}
