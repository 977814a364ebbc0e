//! Synthetic CTRV trajectories with exact ground truth

use crate::filters::angle::normalize_angle;
use crate::filters::ctrv::CtrvModel;
use crate::types::{AugVec, GroundTruth, Measurement, StateVec, STATE_DIM};

/// Noise-free CTRV motion sampled at a fixed period.
///
/// Even samples are reported by the lidar, odd samples by the radar.
#[derive(Clone, Debug)]
pub struct CtrvTrajectory {
    initial: StateVec,
    step_us: i64,
    model: CtrvModel,
}

impl CtrvTrajectory {
    pub fn new(initial: StateVec, step_us: i64) -> Self {
        Self {
            initial,
            step_us,
            model: CtrvModel::default(),
        }
    }

    pub fn timestamp_us(&self, k: usize) -> i64 {
        k as i64 * self.step_us
    }

    /// True state at sample `k`, heading wrapped.
    pub fn state_at(&self, k: usize) -> StateVec {
        // Closed form, so one propagation over the whole span is exact
        let mut aug = AugVec::zeros();
        aug.fixed_rows_mut::<STATE_DIM>(0).copy_from(&self.initial);
        let elapsed = self.timestamp_us(k) as f64 * 1e-6;

        let mut x = self.model.propagate(&aug, elapsed);
        x[3] = normalize_angle(x[3]);
        x
    }

    pub fn ground_truth(&self, k: usize) -> GroundTruth {
        let x = self.state_at(k);
        GroundTruth {
            px: x[0],
            py: x[1],
            vx: x[2] * x[3].cos(),
            vy: x[2] * x[3].sin(),
        }
    }

    pub fn measurement_at(&self, k: usize) -> Measurement {
        let x = self.state_at(k);
        let t = self.timestamp_us(k);
        if k % 2 == 0 {
            return Measurement::lidar(x[0], x[1], t);
        }

        let (p_x, p_y, v, yaw) = (x[0], x[1], x[2], x[3]);
        let rho = p_x.hypot(p_y);
        let rho_dot = if rho > 0.0 {
            (p_x * v * yaw.cos() + p_y * v * yaw.sin()) / rho
        } else {
            0.0
        };
        Measurement::radar(rho, p_y.atan2(p_x), rho_dot, t)
    }

    pub fn measurements(&self, count: usize) -> Vec<Measurement> {
        (0..count).map(|k| self.measurement_at(k)).collect()
    }

    /// Measurements paired with the ground truth at the same instant
    pub fn samples(&self, count: usize) -> Vec<(Measurement, GroundTruth)> {
        (0..count)
            .map(|k| (self.measurement_at(k), self.ground_truth(k)))
            .collect()
    }
}
