//! Constant Turn-Rate and Velocity (CTRV) process model

use crate::types::{AugSigmaPoints, AugVec, PredictedSigmaPoints, StateVec};

/// Default |yaw_rate| below which the straight-line branch is used
pub const DEFAULT_YAW_RATE_EPSILON: f64 = 1e-3;

#[derive(Clone, Copy, Debug)]
pub struct CtrvModel {
    /// Turn-rate magnitude at or below which motion is treated as straight
    pub yaw_rate_epsilon: f64,
}

impl CtrvModel {
    pub fn new(yaw_rate_epsilon: f64) -> Self {
        Self { yaw_rate_epsilon }
    }

    /// Propagate one augmented sigma point over `dt` seconds.
    ///
    /// The two noise components drive the second-order terms and are dropped
    /// from the result.
    pub fn propagate(&self, sigma: &AugVec, dt: f64) -> StateVec {
        let p_x = sigma[0];
        let p_y = sigma[1];
        let v = sigma[2];
        let yaw = sigma[3];
        let yawd = sigma[4];
        let nu_a = sigma[5];
        let nu_yawdd = sigma[6];

        let (mut px_p, mut py_p) = if yawd.abs() > self.yaw_rate_epsilon {
            let yaw_end = yaw + yawd * dt;
            (
                p_x + v / yawd * (yaw_end.sin() - yaw.sin()),
                p_y + v / yawd * (yaw.cos() - yaw_end.cos()),
            )
        } else {
            (p_x + v * dt * yaw.cos(), p_y + v * dt * yaw.sin())
        };

        let mut v_p = v;
        let mut yaw_p = yaw + yawd * dt;
        let mut yawd_p = yawd;

        // Process noise
        let half_dt2 = 0.5 * dt * dt;
        px_p += half_dt2 * nu_a * yaw.cos();
        py_p += half_dt2 * nu_a * yaw.sin();
        v_p += nu_a * dt;
        yaw_p += half_dt2 * nu_yawdd;
        yawd_p += nu_yawdd * dt;

        StateVec::new(px_p, py_p, v_p, yaw_p, yawd_p)
    }

    /// Propagate every augmented sigma point column.
    pub fn propagate_all(&self, sigmas: &AugSigmaPoints, dt: f64) -> PredictedSigmaPoints {
        let mut predicted = PredictedSigmaPoints::zeros();
        for (i, col) in sigmas.column_iter().enumerate() {
            predicted.set_column(i, &self.propagate(&col.into_owned(), dt));
        }
        predicted
    }
}

impl Default for CtrvModel {
    fn default() -> Self {
        Self::new(DEFAULT_YAW_RATE_EPSILON)
    }
}
