//! Unscented Kalman filter tracking a single object under a CTRV motion
//! model, fusing lidar position fixes and radar range/bearing/range-rate.

pub mod consistency;
pub mod error;
pub mod filters;
pub mod sensors;
pub mod simulation;
pub mod types;

pub use error::{SensorLogError, UkfError, UkfResult};
pub use filters::{CtrvUkf, StepOutcome, TrackEstimate, UkfConfig};
pub use types::{GroundTruth, Measurement, SensorKind};
