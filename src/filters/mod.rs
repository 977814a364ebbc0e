pub mod angle;
pub mod ctrv;
pub mod measurement;
pub mod sigma_points;
pub mod ukf_ctrv;
pub mod unscented;

pub use angle::normalize_angle;
pub use measurement::{LidarModel, MeasurementModel, RadarModel};
pub use ukf_ctrv::{CtrvUkf, StepOutcome, TrackEstimate, TrackState, UkfConfig};
pub use unscented::InnovationReport;
