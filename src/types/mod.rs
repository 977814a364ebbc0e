pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Which sensor produced a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Positional sensor reporting Cartesian (px, py)
    Lidar,
    /// Range sensor reporting (rho, phi, rho_dot)
    Radar,
}

impl SensorKind {
    /// Number of raw values a record of this kind carries
    pub fn measurement_dim(self) -> usize {
        match self {
            SensorKind::Lidar => MEASURE_DIM_LIDAR,
            SensorKind::Radar => MEASURE_DIM_RADAR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Lidar => "lidar",
            SensorKind::Radar => "radar",
        }
    }
}

/// A single timestamped sensor report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub sensor: SensorKind,
    /// Raw values in sensor order: (px, py) for lidar, (rho, phi, rho_dot) for radar
    pub raw: Vec<f64>,
    /// Timestamp [microseconds]
    pub timestamp_us: i64,
}

impl Measurement {
    pub fn lidar(px: f64, py: f64, timestamp_us: i64) -> Self {
        Self {
            sensor: SensorKind::Lidar,
            raw: vec![px, py],
            timestamp_us,
        }
    }

    pub fn radar(rho: f64, phi: f64, rho_dot: f64, timestamp_us: i64) -> Self {
        Self {
            sensor: SensorKind::Radar,
            raw: vec![rho, phi, rho_dot],
            timestamp_us,
        }
    }
}

/// Ground-truth kinematics accompanying a logged measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
}
