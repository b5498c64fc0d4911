//! Unit conversions applied at the crate boundary.
//!
//! Everything inside the crate works in centimeters and GeV. Geometry given
//! in meters is converted once, when it is read.

pub const CM_PER_M: f64 = 100.0;

/// Reported yields are scaled by this factor (units of 1e-7 g^-1 cm^2 per muon).
pub const YIELD_DISPLAY_SCALE: f64 = 1e7;

/// Density of water in g/cm^3.
pub const WATER_DENSITY: f64 = 1.0;

#[inline]
pub fn m_to_cm(meters: f64) -> f64 {
    meters * CM_PER_M
}
