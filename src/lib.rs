//! Muon-induced secondary particle and spallation isotope yields in a
//! water-Cherenkov fiducial volume.
//!
//! A transport engine implementing [`TransportHost`] tracks primaries drawn
//! from a [`SpectrumSampler`]; steps inside the [`FiducialVolume`] feed
//! [`RunStatistics`], and [`YieldReport`] normalizes the totals at run end.

pub mod error;
pub mod fast_rng;
pub mod fiducial;
pub mod logging;
pub mod model;
pub mod particle;
pub mod report;
pub mod settings;
pub mod source;
pub mod spectrum;
pub mod stepping;
pub mod tally;
pub mod transport;
pub mod units;

pub use error::{SettingsError, SpectrumError};
pub use fast_rng::{FastRng, UniformSource};
pub use fiducial::FiducialVolume;
pub use model::Model;
pub use particle::{Nucleus, Particle, Secondary, Step, TrackRole};
pub use report::YieldReport;
pub use settings::Settings;
pub use source::MuonSource;
pub use spectrum::{AnalyticSpectrum, SpectrumSampler, SpectrumTable};
pub use stepping::StepRecorder;
pub use tally::{IsotopeKey, RunStatistics};
pub use transport::{StraightLineTransport, TransportHost};
