//! Sensor measurement models used by the unscented update

use nalgebra::{SMatrix, SVector};

use crate::error::{UkfError, UkfResult};
use crate::types::{
    LidarNoise, LidarVec, RadarNoise, RadarVec, StateVec, MEASURE_DIM_LIDAR, MEASURE_DIM_RADAR,
};

/// Default radius below which the radar model refuses to divide by range
pub const DEFAULT_MIN_RANGE: f64 = 1e-4;

/// Maps a predicted state into the measurement space of one sensor.
pub trait MeasurementModel<const NZ: usize> {
    /// Project a 5D state sigma point into measurement space
    fn observe(&self, x: &StateVec) -> UkfResult<SVector<f64, NZ>>;

    /// Fixed measurement noise covariance R
    fn noise(&self) -> &SMatrix<f64, NZ, NZ>;

    /// Measurement component that is an angle and must be wrapped in residuals
    fn angle_index(&self) -> Option<usize> {
        None
    }
}

/// Positional sensor: linear projection onto (px, py).
#[derive(Clone, Debug)]
pub struct LidarModel {
    r: LidarNoise,
}

impl LidarModel {
    pub fn new(std_px: f64, std_py: f64) -> Self {
        Self {
            r: LidarNoise::from_diagonal(&LidarVec::new(std_px * std_px, std_py * std_py)),
        }
    }
}

impl MeasurementModel<MEASURE_DIM_LIDAR> for LidarModel {
    fn observe(&self, x: &StateVec) -> UkfResult<LidarVec> {
        Ok(LidarVec::new(x[0], x[1]))
    }

    fn noise(&self) -> &LidarNoise {
        &self.r
    }
}

/// Range sensor: (rho, phi, rho_dot) in polar coordinates around the origin.
#[derive(Clone, Debug)]
pub struct RadarModel {
    r: RadarNoise,
    min_range: f64,
}

impl RadarModel {
    pub fn new(std_rho: f64, std_phi: f64, std_rho_dot: f64, min_range: f64) -> Self {
        Self {
            r: RadarNoise::from_diagonal(&RadarVec::new(
                std_rho * std_rho,
                std_phi * std_phi,
                std_rho_dot * std_rho_dot,
            )),
            min_range,
        }
    }
}

impl MeasurementModel<MEASURE_DIM_RADAR> for RadarModel {
    fn observe(&self, x: &StateVec) -> UkfResult<RadarVec> {
        let p_x = x[0];
        let p_y = x[1];
        let v = x[2];
        let yaw = x[3];

        let rho = p_x.hypot(p_y);
        if rho < self.min_range {
            return Err(UkfError::DegenerateGeometry {
                range: rho,
                min_range: self.min_range,
            });
        }

        let v1 = yaw.cos() * v;
        let v2 = yaw.sin() * v;
        Ok(RadarVec::new(rho, p_y.atan2(p_x), (p_x * v1 + p_y * v2) / rho))
    }

    fn noise(&self) -> &RadarNoise {
        &self.r
    }

    fn angle_index(&self) -> Option<usize> {
        Some(1)
    }
}
