//! CTRV unscented Kalman filter
//!
//! Owns the track state and runs one predict/update cycle per incoming
//! lidar or radar measurement.

use serde::{Deserialize, Serialize};

use super::angle::normalize_angle;
use super::ctrv::{CtrvModel, DEFAULT_YAW_RATE_EPSILON};
use super::measurement::{LidarModel, MeasurementModel, RadarModel, DEFAULT_MIN_RANGE};
use super::sigma_points::{augment, generate_sigma_points, UkfParams};
use super::unscented::{recombine_state, unscented_update, InnovationReport};
use crate::consistency::NisMonitor;
use crate::error::{UkfError, UkfResult};
use crate::types::{
    LidarVec, Measurement, PredictedSigmaPoints, RadarVec, SensorKind, StateMat, StateVec,
    MEASURE_DIM_LIDAR, MEASURE_DIM_RADAR, STATE_DIM,
};
use nalgebra::SVector;

const MICROS_PER_SECOND: f64 = 1e6;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UkfConfig {
    // ── Sensor toggles (init still uses either sensor) ──
    pub use_laser: bool,
    pub use_radar: bool,

    // ── Process noise ──
    /// Longitudinal acceleration std [m/s²]
    pub std_a: f64,
    /// Yaw acceleration std [rad/s²]
    pub std_yawdd: f64,

    // ── Lidar noise (manufacturer values) ──
    pub std_laspx: f64,
    pub std_laspy: f64,

    // ── Radar noise (manufacturer values) ──
    pub std_radr: f64,
    pub std_radphi: f64,
    pub std_radrd: f64,

    // ── Numerical guards ──
    pub yaw_rate_epsilon: f64,
    pub min_range: f64,

    /// Prior variances for (px, py, v, yaw, yaw_rate) at initialization
    pub initial_covariance_diag: [f64; STATE_DIM],
}

impl Default for UkfConfig {
    fn default() -> Self {
        Self {
            use_laser: true,
            use_radar: true,
            std_a: 2.0,
            std_yawdd: 1.0,
            std_laspx: 0.15,
            std_laspy: 0.15,
            std_radr: 0.3,
            std_radphi: 0.03,
            std_radrd: 0.3,
            yaw_rate_epsilon: DEFAULT_YAW_RATE_EPSILON,
            min_range: DEFAULT_MIN_RANGE,
            initial_covariance_diag: [0.2, 0.2, 2.0, 0.1, 0.1],
        }
    }
}

impl UkfConfig {
    /// Reject non-positive or non-finite noise and guard values.
    pub fn validate(&self) -> UkfResult<()> {
        let named = [
            ("std_a", self.std_a),
            ("std_yawdd", self.std_yawdd),
            ("std_laspx", self.std_laspx),
            ("std_laspy", self.std_laspy),
            ("std_radr", self.std_radr),
            ("std_radphi", self.std_radphi),
            ("std_radrd", self.std_radrd),
            ("yaw_rate_epsilon", self.yaw_rate_epsilon),
            ("min_range", self.min_range),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(UkfError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        for (i, var) in self.initial_covariance_diag.iter().enumerate() {
            if !var.is_finite() || *var <= 0.0 {
                return Err(UkfError::InvalidConfig(format!(
                    "initial_covariance_diag[{}] must be positive and finite, got {}",
                    i, var
                )));
            }
        }
        Ok(())
    }
}

// ─── State store and outputs ─────────────────────────────────────────────────

/// Mean, covariance and reference time of the tracked object.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackState {
    /// (px, py, v, yaw, yaw_rate)
    pub x: StateVec,
    pub p: StateMat,
    /// Timestamp of the last processed measurement [µs]
    pub timestamp_us: i64,
}

/// What a call to [`CtrvUkf::process_measurement`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// First measurement, state seeded directly from it
    Initialized { sensor: SensorKind },
    /// Predicted and corrected with the measurement
    Updated { sensor: SensorKind, nis: f64 },
    /// Predicted only, the sensor is disabled for updates
    Predicted { sensor: SensorKind },
}

/// Serializable snapshot of the current estimate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackEstimate {
    pub timestamp_us: i64,
    /// Position [m]
    pub position: (f64, f64),
    /// Speed along heading [m/s]
    pub speed: f64,
    /// Heading [rad], in (-π, π]
    pub yaw: f64,
    /// Heading rate [rad/s]
    pub yaw_rate: f64,
    /// Cartesian velocity [m/s]
    pub velocity: (f64, f64),
    /// Covariance trace for uncertainty
    pub covariance_trace: f64,

    /// Update counters
    pub lidar_updates: u64,
    pub radar_updates: u64,
    pub steps: u64,
}

// ─── Filter ──────────────────────────────────────────────────────────────────

pub struct CtrvUkf {
    config: UkfConfig,
    params: UkfParams,
    process: CtrvModel,
    lidar: LidarModel,
    radar: RadarModel,

    /// None until the first measurement arrives
    track: Option<TrackState>,

    nis: NisMonitor,
    steps: u64,
    lidar_updates: u64,
    radar_updates: u64,
}

impl CtrvUkf {
    /// Create a filter, rejecting invalid noise parameters.
    pub fn new(config: UkfConfig) -> UkfResult<Self> {
        config.validate()?;

        Ok(Self {
            params: UkfParams::new(),
            process: CtrvModel::new(config.yaw_rate_epsilon),
            lidar: LidarModel::new(config.std_laspx, config.std_laspy),
            radar: RadarModel::new(
                config.std_radr,
                config.std_radphi,
                config.std_radrd,
                config.min_range,
            ),
            config,
            track: None,
            nis: NisMonitor::new(),
            steps: 0,
            lidar_updates: 0,
            radar_updates: 0,
        })
    }

    pub fn config(&self) -> &UkfConfig {
        &self.config
    }

    pub fn params(&self) -> &UkfParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.track.is_some()
    }

    /// Current state mean (px, py, v, yaw, yaw_rate)
    pub fn state(&self) -> Option<&StateVec> {
        self.track.as_ref().map(|t| &t.x)
    }

    pub fn covariance(&self) -> Option<&StateMat> {
        self.track.as_ref().map(|t| &t.p)
    }

    pub fn timestamp_us(&self) -> Option<i64> {
        self.track.as_ref().map(|t| t.timestamp_us)
    }

    pub fn track(&self) -> Option<&TrackState> {
        self.track.as_ref()
    }

    pub fn nis_monitor(&self) -> &NisMonitor {
        &self.nis
    }

    /// Number of measurements processed, including the initializing one
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn estimate(&self) -> Option<TrackEstimate> {
        let t = self.track.as_ref()?;
        let v = t.x[2];
        let yaw = t.x[3];
        Some(TrackEstimate {
            timestamp_us: t.timestamp_us,
            position: (t.x[0], t.x[1]),
            speed: v,
            yaw,
            yaw_rate: t.x[4],
            velocity: (v * yaw.cos(), v * yaw.sin()),
            covariance_trace: t.p.trace(),
            lidar_updates: self.lidar_updates,
            radar_updates: self.radar_updates,
            steps: self.steps,
        })
    }

    /// Run one filter cycle for a measurement.
    ///
    /// The first measurement initializes the track. Every later one predicts
    /// over the elapsed time and then, unless its sensor is disabled,
    /// corrects with the sensor's measurement model. On error the predict
    /// step may already have been applied.
    pub fn process_measurement(&mut self, meas: &Measurement) -> UkfResult<StepOutcome> {
        let expected = meas.sensor.measurement_dim();
        if meas.raw.len() != expected {
            return Err(UkfError::DimensionMismatch {
                expected,
                found: meas.raw.len(),
            });
        }
        let elapsed_us = match self.track.as_ref() {
            Some(track) => Some(meas.timestamp_us.checked_sub(track.timestamp_us).ok_or(
                UkfError::TimestampOverflow {
                    previous: track.timestamp_us,
                    current: meas.timestamp_us,
                },
            )?),
            None => None,
        };
        self.steps += 1;

        let (Some(mut track), Some(elapsed_us)) = (self.track.take(), elapsed_us) else {
            let track = self.initialize(meas);
            log::debug!(
                "[UKF] initialized from {} at t={} us: {:?}",
                meas.sensor.label(),
                meas.timestamp_us,
                track.x.as_slice()
            );
            self.track = Some(track);
            return Ok(StepOutcome::Initialized { sensor: meas.sensor });
        };

        let result = self.cycle(&mut track, meas, elapsed_us);
        self.track = Some(track);
        let outcome = result?;

        if let StepOutcome::Updated { sensor, nis } = outcome {
            match sensor {
                SensorKind::Lidar => self.lidar_updates += 1,
                SensorKind::Radar => self.radar_updates += 1,
            }
            self.nis.record(sensor, nis);
        }
        Ok(outcome)
    }

    /// Predict and update an initialized track.
    fn cycle(
        &self,
        track: &mut TrackState,
        meas: &Measurement,
        elapsed_us: i64,
    ) -> UkfResult<StepOutcome> {
        if elapsed_us < 0 {
            log::warn!(
                "[UKF] out-of-order {} measurement: dt = {} us",
                meas.sensor.label(),
                elapsed_us
            );
        }
        let dt = elapsed_us as f64 / MICROS_PER_SECOND;
        track.timestamp_us = meas.timestamp_us;

        let sigmas = self
            .predict(track, dt)
            .inspect_err(|e| log::warn!("[UKF] prediction aborted: {}", e))?;

        let enabled = match meas.sensor {
            SensorKind::Lidar => self.config.use_laser,
            SensorKind::Radar => self.config.use_radar,
        };
        if !enabled {
            log::debug!("[UKF] {} disabled, prediction only", meas.sensor.label());
            return Ok(StepOutcome::Predicted { sensor: meas.sensor });
        }

        let nis = match meas.sensor {
            SensorKind::Lidar => {
                let z = LidarVec::from_column_slice(&meas.raw);
                self.update_lidar(track, &sigmas, &z)?.nis
            }
            SensorKind::Radar => {
                let z = RadarVec::from_column_slice(&meas.raw);
                self.update_radar(track, &sigmas, &z)?.nis
            }
        };

        log::debug!(
            "[UKF] step {} {} update: x={:?} nis={:.3}",
            self.steps,
            meas.sensor.label(),
            track.x.as_slice(),
            nis
        );
        Ok(StepOutcome::Updated {
            sensor: meas.sensor,
            nis,
        })
    }

    fn initialize(&self, meas: &Measurement) -> TrackState {
        let x = match meas.sensor {
            // Velocity is unobservable from a single position fix
            SensorKind::Lidar => StateVec::new(meas.raw[0], meas.raw[1], 0.0, 0.0, 0.0),
            SensorKind::Radar => {
                let (rho, phi, rho_dot) = (meas.raw[0], meas.raw[1], meas.raw[2]);
                StateVec::new(
                    rho * phi.cos(),
                    rho * phi.sin(),
                    rho_dot,
                    normalize_angle(phi),
                    0.0,
                )
            }
        };
        let p = StateMat::from_diagonal(&StateVec::from_column_slice(
            &self.config.initial_covariance_diag,
        ));

        TrackState {
            x,
            p,
            timestamp_us: meas.timestamp_us,
        }
    }

    /// Predictor: propagate the track over `dt` seconds.
    ///
    /// Returns the propagated sigma points so the update can reuse them.
    /// The track is left untouched if sigma point generation fails.
    pub fn predict(&self, track: &mut TrackState, dt: f64) -> UkfResult<PredictedSigmaPoints> {
        // 1. Augmented sigma points
        let (x_aug, p_aug) = augment(&track.x, &track.p, self.config.std_a, self.config.std_yawdd);
        let sigmas = generate_sigma_points(&x_aug, &p_aug, &self.params)?;

        // 2. Propagate through the CTRV model
        let predicted = self.process.propagate_all(&sigmas, dt);

        // 3. Recombine
        let (x, p) = recombine_state(&predicted, &self.params.weights);
        track.x = x;
        track.p = p;

        log::trace!("[UKF] predicted dt={:.4}s x={:?}", dt, track.x.as_slice());
        Ok(predicted)
    }

    /// Correct with a lidar position fix (px, py).
    pub fn update_lidar(
        &self,
        track: &mut TrackState,
        sigmas: &PredictedSigmaPoints,
        z: &LidarVec,
    ) -> UkfResult<InnovationReport<MEASURE_DIM_LIDAR>> {
        Self::update(track, sigmas, &self.params, &self.lidar, z)
    }

    /// Correct with a radar return (rho, phi, rho_dot).
    pub fn update_radar(
        &self,
        track: &mut TrackState,
        sigmas: &PredictedSigmaPoints,
        z: &RadarVec,
    ) -> UkfResult<InnovationReport<MEASURE_DIM_RADAR>> {
        Self::update(track, sigmas, &self.params, &self.radar, z)
    }

    fn update<const NZ: usize, M: MeasurementModel<NZ>>(
        track: &mut TrackState,
        sigmas: &PredictedSigmaPoints,
        params: &UkfParams,
        model: &M,
        z: &SVector<f64, NZ>,
    ) -> UkfResult<InnovationReport<NZ>> {
        unscented_update(&mut track.x, &mut track.p, sigmas, &params.weights, model, z)
            .inspect_err(|e| log::warn!("[UKF] update skipped: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::CtrvTrajectory;
    use crate::types::YAW_INDEX;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    fn filter() -> CtrvUkf {
        CtrvUkf::new(UkfConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = UkfConfig::default();
        config.std_a = 0.0;
        assert!(matches!(CtrvUkf::new(config), Err(UkfError::InvalidConfig(_))));

        let mut config = UkfConfig::default();
        config.std_radphi = -0.03;
        assert!(matches!(CtrvUkf::new(config), Err(UkfError::InvalidConfig(_))));

        let mut config = UkfConfig::default();
        config.initial_covariance_diag[3] = f64::NAN;
        assert!(matches!(CtrvUkf::new(config), Err(UkfError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: UkfConfig =
            serde_json::from_str(r#"{"std_a": 1.5, "use_radar": false}"#).unwrap();
        assert_eq!(config.std_a, 1.5);
        assert!(!config.use_radar);
        assert_eq!(config.std_yawdd, UkfConfig::default().std_yawdd);
    }

    #[test]
    fn test_lidar_initialization() {
        let mut ukf = filter();
        let outcome = ukf.process_measurement(&Measurement::lidar(5.0, 3.0, 0)).unwrap();

        assert_eq!(outcome, StepOutcome::Initialized { sensor: SensorKind::Lidar });
        assert_eq!(*ukf.state().unwrap(), StateVec::new(5.0, 3.0, 0.0, 0.0, 0.0));
        let p = ukf.covariance().unwrap();
        assert_eq!(p[(0, 0)], 0.2);
        assert_eq!(p[(2, 2)], 2.0);
        assert_eq!(p[(0, 1)], 0.0);
        assert_eq!(ukf.timestamp_us(), Some(0));
    }

    #[test]
    fn test_radar_initialization() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::radar(2.0, PI / 6.0, 1.5, 42)).unwrap();

        let x = ukf.state().unwrap();
        assert_relative_eq!(x[0], 3f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 1.5);
        assert_relative_eq!(x[3], PI / 6.0);
        assert_eq!(x[4], 0.0);
    }

    #[test]
    fn test_second_lidar_measurement_builds_speed() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::lidar(5.0, 3.0, 0)).unwrap();
        let outcome = ukf.process_measurement(&Measurement::lidar(5.2, 3.0, 100_000)).unwrap();

        assert!(matches!(outcome, StepOutcome::Updated { sensor: SensorKind::Lidar, .. }));
        let x = ukf.state().unwrap();
        assert!(x[2] > 0.0, "speed {}", x[2]);
        assert!(x[0] > 5.0 && x[0] <= 5.2 + 1e-9, "px {}", x[0]);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-2);
        assert_eq!(ukf.timestamp_us(), Some(100_000));
    }

    #[test]
    fn test_consistent_radar_measurement_changes_little() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::radar(5.0, 0.0, 0.0, 0)).unwrap();
        assert_eq!(*ukf.state().unwrap(), StateVec::new(5.0, 0.0, 0.0, 0.0, 0.0));

        let outcome = ukf
            .process_measurement(&Measurement::radar(5.0, 0.0, 0.0, 100_000))
            .unwrap();
        let StepOutcome::Updated { nis, .. } = outcome else {
            panic!("expected an update, got {:?}", outcome);
        };
        assert!(nis < 0.1, "nis {}", nis);

        let x = ukf.state().unwrap();
        let expected = StateVec::new(5.0, 0.0, 0.0, 0.0, 0.0);
        assert!((x - expected).norm() < 0.05, "state drifted to {:?}", x.as_slice());
    }

    #[test]
    fn test_disabled_sensor_only_predicts() {
        let config = UkfConfig {
            use_radar: false,
            ..UkfConfig::default()
        };
        let mut ukf = CtrvUkf::new(config).unwrap();
        ukf.process_measurement(&Measurement::lidar(5.0, 3.0, 0)).unwrap();
        let trace_before = ukf.covariance().unwrap().trace();

        let outcome = ukf.process_measurement(&Measurement::radar(9.0, 1.0, 2.0, 50_000)).unwrap();

        assert_eq!(outcome, StepOutcome::Predicted { sensor: SensorKind::Radar });
        assert_eq!(ukf.timestamp_us(), Some(50_000));
        // Prediction only grows uncertainty and leaves a stationary mean in place
        assert!(ukf.covariance().unwrap().trace() > trace_before);
        assert_abs_diff_eq!(ukf.state().unwrap()[0], 5.0, epsilon = 1e-9);
        assert!(ukf.nis_monitor().summary(SensorKind::Radar).is_none());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut ukf = filter();
        let bad = Measurement {
            sensor: SensorKind::Radar,
            raw: vec![1.0, 2.0],
            timestamp_us: 0,
        };
        let err = ukf.process_measurement(&bad).unwrap_err();
        assert_eq!(err, UkfError::DimensionMismatch { expected: 3, found: 2 });
        assert!(!ukf.is_initialized());
        assert_eq!(ukf.steps(), 0);
    }

    #[test]
    fn test_overflowing_timestamp_rejected() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::lidar(1.0, 1.0, i64::MIN + 10)).unwrap();
        let before = ukf.track().unwrap().clone();

        let err = ukf.process_measurement(&Measurement::lidar(1.0, 1.0, i64::MAX)).unwrap_err();

        assert!(matches!(err, UkfError::TimestampOverflow { .. }));
        assert_eq!(ukf.track(), Some(&before));
        assert_eq!(ukf.steps(), 1);
    }

    #[test]
    fn test_radar_at_origin_keeps_predicted_state() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::lidar(0.0, 0.0, 0)).unwrap();

        let err = ukf
            .process_measurement(&Measurement::radar(0.0, 0.0, 0.0, 100_000))
            .unwrap_err();
        assert!(matches!(err, UkfError::DegenerateGeometry { .. }));

        // Predicted state survives and the next lidar fix still works
        assert_eq!(ukf.timestamp_us(), Some(100_000));
        let outcome = ukf.process_measurement(&Measurement::lidar(0.1, 0.0, 200_000)).unwrap();
        assert!(matches!(outcome, StepOutcome::Updated { .. }));
    }

    #[test]
    fn test_negative_dt_is_processed() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::lidar(1.0, 1.0, 1_000_000)).unwrap();
        let outcome = ukf.process_measurement(&Measurement::lidar(1.0, 1.0, 900_000)).unwrap();
        assert!(matches!(outcome, StepOutcome::Updated { .. }));
        assert_eq!(ukf.timestamp_us(), Some(900_000));
    }

    #[test]
    fn test_broken_covariance_aborts_prediction() {
        let ukf = filter();
        let mut track = TrackState {
            x: StateVec::zeros(),
            p: -StateMat::identity(),
            timestamp_us: 0,
        };
        let before = track.clone();
        let err = ukf.predict(&mut track, 0.1).unwrap_err();
        assert_eq!(err, UkfError::NotPositiveDefinite);
        assert_eq!(track, before);
    }

    #[test]
    fn test_manual_cycle_matches_process_measurement() {
        let mut ukf = filter();
        ukf.process_measurement(&Measurement::radar(6.0, 0.4, 1.0, 0)).unwrap();
        let mut track = ukf.track().unwrap().clone();

        ukf.process_measurement(&Measurement::radar(6.1, 0.41, 1.1, 100_000)).unwrap();

        let sigmas = ukf.predict(&mut track, 0.1).unwrap();
        let report = ukf
            .update_radar(&mut track, &sigmas, &RadarVec::new(6.1, 0.41, 1.1))
            .unwrap();

        assert_relative_eq!(track.x, *ukf.state().unwrap(), epsilon = 1e-12);
        assert_relative_eq!(track.p, *ukf.covariance().unwrap(), epsilon = 1e-12);
        let summary = ukf.nis_monitor().summary(SensorKind::Radar).unwrap();
        assert_relative_eq!(summary.last.unwrap(), report.nis, epsilon = 1e-12);

        let sigmas = ukf.predict(&mut track, 0.1).unwrap();
        let report = ukf.update_lidar(&mut track, &sigmas, &LidarVec::new(6.0, 2.6)).unwrap();
        assert_eq!(report.innovation.len(), 2);
        assert!(report.nis >= 0.0);
    }

    #[test]
    fn test_heading_stays_wrapped() {
        let mut ukf = filter();
        // Object circling fast enough to cross ±π several times
        let traj = CtrvTrajectory::new(StateVec::new(20.0, 0.0, 5.0, 3.0, 1.5), 50_000);
        for meas in traj.measurements(120) {
            ukf.process_measurement(&meas).unwrap();
            let yaw = ukf.state().unwrap()[YAW_INDEX];
            assert!(yaw > -PI && yaw <= PI, "yaw {}", yaw);
        }
    }

    #[test]
    fn test_converges_on_noiseless_trajectory() {
        let truth0 = StateVec::new(10.0, 5.0, 3.0, 0.3, 0.2);
        let traj = CtrvTrajectory::new(truth0, 50_000);
        let mut ukf = filter();

        let mut traces = Vec::new();
        for meas in traj.measurements(200) {
            ukf.process_measurement(&meas).unwrap();
            traces.push(ukf.covariance().unwrap().trace());
        }

        let truth = traj.state_at(199);
        let x = ukf.state().unwrap();
        assert_abs_diff_eq!(x[0], truth[0], epsilon = 0.2);
        assert_abs_diff_eq!(x[1], truth[1], epsilon = 0.2);
        assert_abs_diff_eq!(x[2], truth[2], epsilon = 0.5);
        assert_abs_diff_eq!(normalize_angle(x[3] - truth[3]), 0.0, epsilon = 0.2);
        assert_abs_diff_eq!(x[4], truth[4], epsilon = 0.2);

        // Uncertainty shrinks every cycle while the prior washes out
        for k in 1..=25 {
            assert!(traces[k] < traces[k - 1], "trace grew at cycle {}", k);
        }
        // and stays below the transient once settled
        let mean = |w: &[f64]| w.iter().sum::<f64>() / w.len() as f64;
        assert!(mean(&traces[50..100]) < mean(&traces[10..50]));
        let settled_max = traces[50..].iter().cloned().fold(0.0, f64::max);
        assert!(settled_max < traces[10], "settled trace {}", settled_max);

        let estimate = ukf.estimate().unwrap();
        assert_eq!(estimate.steps, 200);
        assert_eq!(estimate.lidar_updates + estimate.radar_updates, 199);
    }
}
