use std::path::PathBuf;

/// Failures while building or drawing from a muon energy spectrum.
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    #[error("could not read spectrum file {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spectrum file {} is empty or invalid: {reason}", path.display())]
    EmptyOrInvalidSpectrum { path: PathBuf, reason: String },

    #[error("rejection sampling gave up after {attempts} attempts (last candidate {last_candidate} GeV)")]
    SamplingExhausted { attempts: usize, last_candidate: f64 },
}

/// Failures while loading run settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
