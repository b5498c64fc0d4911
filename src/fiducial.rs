use serde::Deserialize;

use crate::units::m_to_cm;

pub const DEFAULT_RADIUS_M: f64 = 15.15;
pub const DEFAULT_HALF_HEIGHT_M: f64 = 16.2;

/// Upright cylinder centered on the origin inside which interactions count.
///
/// Dimensions are stored in centimeters; boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiducialVolume {
    radius_cm: f64,
    half_height_cm: f64,
}

impl FiducialVolume {
    pub fn new(radius_cm: f64, half_height_cm: f64) -> Result<Self, String> {
        if !(radius_cm > 0.0) || !radius_cm.is_finite() {
            return Err(format!("fiducial radius must be positive, got {radius_cm} cm"));
        }
        if !(half_height_cm > 0.0) || !half_height_cm.is_finite() {
            return Err(format!("fiducial half-height must be positive, got {half_height_cm} cm"));
        }
        Ok(Self {
            radius_cm,
            half_height_cm,
        })
    }

    pub fn from_meters(radius_m: f64, half_height_m: f64) -> Result<Self, String> {
        Self::new(m_to_cm(radius_m), m_to_cm(half_height_m))
    }

    pub fn radius_cm(&self) -> f64 {
        self.radius_cm
    }

    pub fn half_height_cm(&self) -> f64 {
        self.half_height_cm
    }

    /// Whether `pos` (cm) lies inside or on the cylinder.
    pub fn contains(&self, pos: [f64; 3]) -> bool {
        let r = (pos[0] * pos[0] + pos[1] * pos[1]).sqrt();
        r <= self.radius_cm && pos[2].abs() <= self.half_height_cm
    }

    /// Same as [`contains`](Self::contains) for a position in meters.
    pub fn contains_m(&self, pos: [f64; 3]) -> bool {
        self.contains([m_to_cm(pos[0]), m_to_cm(pos[1]), m_to_cm(pos[2])])
    }
}

impl Default for FiducialVolume {
    fn default() -> Self {
        Self {
            radius_cm: m_to_cm(DEFAULT_RADIUS_M),
            half_height_cm: m_to_cm(DEFAULT_HALF_HEIGHT_M),
        }
    }
}

/// Fiducial dimensions as written in a settings file, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FiducialSpec {
    pub radius_m: f64,
    pub half_height_m: f64,
}

impl Default for FiducialSpec {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            half_height_m: DEFAULT_HALF_HEIGHT_M,
        }
    }
}

impl FiducialSpec {
    pub fn build(&self) -> Result<FiducialVolume, String> {
        FiducialVolume::from_meters(self.radius_m, self.half_height_m)
    }
}
