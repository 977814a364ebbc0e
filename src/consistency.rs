//! Filter consistency and accuracy metrics
//!
//! NIS (normalized innovation squared) should follow a χ² distribution with
//! as many degrees of freedom as the measurement has components. About 5% of
//! updates are expected above the 95% threshold for a well-tuned filter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{UkfError, UkfResult};
use crate::types::{GroundTruth, SensorKind, StateVec};

/// χ² 95% quantile for 2 degrees of freedom (lidar)
pub const CHI2_95_DOF2: f64 = 5.991;
/// χ² 95% quantile for 3 degrees of freedom (radar)
pub const CHI2_95_DOF3: f64 = 7.815;

pub fn chi2_95(sensor: SensorKind) -> f64 {
    match sensor {
        SensorKind::Lidar => CHI2_95_DOF2,
        SensorKind::Radar => CHI2_95_DOF3,
    }
}

#[derive(Clone, Debug, Default)]
struct NisAccumulator {
    count: u64,
    sum: f64,
    above_threshold: u64,
    last: Option<f64>,
}

/// Per-sensor NIS statistics.
#[derive(Clone, Debug, Default)]
pub struct NisMonitor {
    per_sensor: HashMap<SensorKind, NisAccumulator>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NisSummary {
    pub sensor: SensorKind,
    pub count: u64,
    pub mean: f64,
    pub threshold: f64,
    /// Share of updates whose NIS exceeded the 95% threshold
    pub fraction_above: f64,
    pub last: Option<f64>,
}

impl NisMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sensor: SensorKind, nis: f64) {
        let acc = self.per_sensor.entry(sensor).or_default();
        acc.count += 1;
        acc.sum += nis;
        if nis > chi2_95(sensor) {
            acc.above_threshold += 1;
        }
        acc.last = Some(nis);
    }

    pub fn summary(&self, sensor: SensorKind) -> Option<NisSummary> {
        let acc = self.per_sensor.get(&sensor)?;
        if acc.count == 0 {
            return None;
        }
        let n = acc.count as f64;
        Some(NisSummary {
            sensor,
            count: acc.count,
            mean: acc.sum / n,
            threshold: chi2_95(sensor),
            fraction_above: acc.above_threshold as f64 / n,
            last: acc.last,
        })
    }

    /// Summaries for every sensor that produced at least one update
    pub fn summaries(&self) -> Vec<NisSummary> {
        [SensorKind::Lidar, SensorKind::Radar]
            .into_iter()
            .filter_map(|s| self.summary(s))
            .collect()
    }
}

/// Cartesian (px, py, vx, vy) view of a CTRV state.
pub fn to_cartesian(x: &StateVec) -> [f64; 4] {
    let v = x[2];
    let yaw = x[3];
    [x[0], x[1], v * yaw.cos(), v * yaw.sin()]
}

/// Root-mean-square error over (px, py, vx, vy).
pub fn rmse(estimates: &[StateVec], truths: &[GroundTruth]) -> UkfResult<[f64; 4]> {
    if estimates.is_empty() {
        return Err(UkfError::Evaluation("no estimates to evaluate".to_string()));
    }
    if estimates.len() != truths.len() {
        return Err(UkfError::Evaluation(format!(
            "{} estimates but {} ground-truth samples",
            estimates.len(),
            truths.len()
        )));
    }

    let mut sum_sq = [0.0; 4];
    for (est, gt) in estimates.iter().zip(truths) {
        let e = to_cartesian(est);
        let t = [gt.px, gt.py, gt.vx, gt.vy];
        for i in 0..4 {
            sum_sq[i] += (e[i] - t[i]).powi(2);
        }
    }

    let n = estimates.len() as f64;
    Ok(sum_sq.map(|s| (s / n).sqrt()))
}
