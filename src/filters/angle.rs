use std::f64::consts::{PI, TAU};

/// Wrap an angle into (-π, π].
///
/// Constant time for any finite input. Angles already inside the range are
/// returned bit-for-bit unchanged.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    // Rounding can land exactly on -π for inputs just above π
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}
