use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;
use crate::fiducial::{FiducialSpec, FiducialVolume};
use crate::source::DEFAULT_START_Z_M;
use crate::spectrum::DEFAULT_MAX_REJECTION_ATTEMPTS;
use crate::units::WATER_DENSITY;

pub const DEFAULT_EVENTS: u64 = 100_000;
pub const DEFAULT_SEED: u64 = 1;

/// Run configuration. Every field has a default, so a settings file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub events: u64,
    pub seed: u64,
    pub spectrum_file: Option<PathBuf>,
    /// Use the analytic broken power law instead of any table.
    pub analytic_spectrum: bool,
    pub max_rejection_attempts: usize,
    /// Target density in g/cm^3.
    pub density: f64,
    pub fiducial: FiducialSpec,
    pub start_z_m: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events: DEFAULT_EVENTS,
            seed: DEFAULT_SEED,
            spectrum_file: None,
            analytic_spectrum: false,
            max_rejection_attempts: DEFAULT_MAX_REJECTION_ATTEMPTS,
            density: WATER_DENSITY,
            fiducial: FiducialSpec::default(),
            start_z_m: DEFAULT_START_Z_M,
        }
    }
}

impl Settings {
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Apply `[events] [spectrum_file]` positional arguments.
    ///
    /// An event count that does not parse is reported and leaves the current
    /// value in place. The spectrum path is taken as given, whatever its
    /// encoding.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut args = args.into_iter();
        let mut result = Ok(());
        if let Some(events) = args.next() {
            let events = events.as_ref();
            match events.to_str().and_then(|text| text.parse::<u64>().ok()) {
                Some(n) => self.events = n,
                None => {
                    result = Err(SettingsError::Invalid {
                        field: "events",
                        reason: format!("'{}' is not a non-negative integer", events.to_string_lossy()),
                    })
                }
            }
        }
        if let Some(path) = args.next() {
            self.spectrum_file = Some(PathBuf::from(path.as_ref()));
        }
        result
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.density > 0.0) || !self.density.is_finite() {
            return Err(SettingsError::Invalid {
                field: "density",
                reason: format!("must be positive, got {}", self.density),
            });
        }
        if self.max_rejection_attempts == 0 {
            return Err(SettingsError::Invalid {
                field: "max_rejection_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        self.fiducial_volume()?;
        Ok(())
    }

    pub fn fiducial_volume(&self) -> Result<FiducialVolume, SettingsError> {
        self.fiducial
            .build()
            .map_err(|reason| SettingsError::Invalid {
                field: "fiducial",
                reason,
            })
    }
}
