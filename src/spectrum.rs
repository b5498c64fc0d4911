//! Cosmic-ray muon energy spectra.
//!
//! Energies are in GeV. A spectrum is either a tabulated cumulative
//! distribution (read from a file or built from the fallback power law) or
//! the analytic broken power law drawn by rejection sampling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::error::SpectrumError;
use crate::fast_rng::UniformSource;

/// Number of bins in the fallback histogram.
pub const FALLBACK_BINS: usize = 500;
pub const FALLBACK_E_MIN: f64 = 6.0;
pub const FALLBACK_E_MAX: f64 = 2000.0;
/// Below this bin center the fallback spectrum flattens to E^-1.5.
const FALLBACK_KNEE: f64 = 30.0;

pub const ANALYTIC_E_MIN: f64 = 6.0;
pub const ANALYTIC_E_MAX: f64 = 4000.0;
pub const DEFAULT_MAX_REJECTION_ATTEMPTS: usize = 10_000;

static FALLBACK_TABLE: Lazy<SpectrumTable> = Lazy::new(SpectrumTable::build_fallback);

/// Stepwise cumulative distribution over a list of energies.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    energies: Vec<f64>,
    cdf: Vec<f64>,
    monotonic: bool,
}

impl SpectrumTable {
    /// Build a table from energies and their (unnormalized) weights.
    ///
    /// Returns `None` when there are no entries or the weights do not sum
    /// to a positive value.
    pub fn from_weights(energies: Vec<f64>, weights: &[f64]) -> Option<Self> {
        if energies.is_empty() || energies.len() != weights.len() {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return None;
        }
        Some(Self::accumulate(energies, weights, total))
    }

    fn accumulate(energies: Vec<f64>, weights: &[f64], total: f64) -> Self {
        let mut cdf = Vec::with_capacity(weights.len());
        let mut cumulative = 0.0;
        for w in weights {
            cumulative += w / total;
            cdf.push(cumulative.min(1.0));
        }
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }
        let monotonic = cdf.windows(2).all(|pair| pair[0] <= pair[1]);

        Self {
            energies,
            cdf,
            monotonic,
        }
    }

    /// Read a two-column `energy weight` spectrum file.
    ///
    /// Lines starting with `#` and empty lines are ignored, as are lines that
    /// are not UTF-8, do not start with two numbers, or whose energy is not
    /// positive.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpectrumError> {
        let path = path.as_ref();
        let unreadable = |source| SpectrumError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(unreadable)?);

        let mut energies = Vec::new();
        let mut weights = Vec::new();
        for raw in reader.split(b'\n') {
            let raw = raw.map_err(unreadable)?;
            let Ok(line) = std::str::from_utf8(&raw) else {
                continue;
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((energy, weight)) = parse_row(line) {
                energies.push(energy);
                weights.push(weight);
            }
        }

        if energies.is_empty() {
            return Err(SpectrumError::EmptyOrInvalidSpectrum {
                path: path.to_path_buf(),
                reason: "no usable rows".to_string(),
            });
        }
        let rows = energies.len();
        Self::from_weights(energies, &weights).ok_or_else(|| SpectrumError::EmptyOrInvalidSpectrum {
            path: path.to_path_buf(),
            reason: format!("weights of {rows} rows do not sum to a positive value"),
        })
    }

    /// Piecewise power law over linear bins between 6 and 2000 GeV.
    pub fn build_fallback() -> Self {
        let width = (FALLBACK_E_MAX - FALLBACK_E_MIN) / FALLBACK_BINS as f64;
        let energies: Vec<f64> = (0..FALLBACK_BINS)
            .map(|i| FALLBACK_E_MIN + width * (i as f64 + 0.5))
            .collect();
        let weights: Vec<f64> = energies
            .iter()
            .map(|&e| if e < FALLBACK_KNEE { e.powf(-1.5) } else { e.powf(-2.7) })
            .collect();

        let total = weights.iter().sum();
        Self::accumulate(energies, &weights, total)
    }

    /// The shared fallback table, built on first use.
    pub fn fallback() -> &'static Self {
        &FALLBACK_TABLE
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Energy of the first entry whose cumulative value reaches `u`.
    ///
    /// Falls back to the last energy when `u` lies beyond the table.
    pub fn invert(&self, u: f64) -> f64 {
        let idx = if self.monotonic {
            self.cdf.partition_point(|&c| c < u)
        } else {
            // negative weights: keep first-match semantics without assuming order
            self.cdf.iter().position(|&c| c >= u).unwrap_or(self.cdf.len())
        };
        match self.energies.get(idx) {
            Some(&e) => e,
            None => self.energies[self.energies.len() - 1],
        }
    }

    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        self.invert(rng.next_uniform())
    }
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let energy: f64 = fields.next()?.parse().ok()?;
    let weight: f64 = fields.next()?.parse().ok()?;
    if !energy.is_finite() || !weight.is_finite() || energy <= 0.0 {
        return None;
    }
    Some((energy, weight))
}

/// Broken power-law approximation of the underground muon spectrum.
///
/// Candidates are drawn log-uniformly and accepted against the normalized
/// weight; the loop gives up after `max_attempts` candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticSpectrum {
    pub max_attempts: usize,
}

impl Default for AnalyticSpectrum {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_REJECTION_ATTEMPTS,
        }
    }
}

impl AnalyticSpectrum {
    /// Unnormalized differential weight at `energy` GeV.
    pub fn raw_weight(energy: f64) -> f64 {
        if energy < 10.0 {
            energy.powf(-1.0)
        } else if energy < 100.0 {
            energy.powf(-2.0)
        } else if energy < 1000.0 {
            energy.powf(-2.7)
        } else {
            energy.powf(-3.5)
        }
    }

    /// Weight scaled so that its maximum over the sampling range is 1.
    pub fn weight(energy: f64) -> f64 {
        // every piece decreases and each break steps down, so the peak is at E_min
        Self::raw_weight(energy) / Self::raw_weight(ANALYTIC_E_MIN)
    }

    pub fn try_sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Result<f64, SpectrumError> {
        let log_min = ANALYTIC_E_MIN.log10();
        let log_span = ANALYTIC_E_MAX.log10() - log_min;

        let mut candidate = ANALYTIC_E_MIN;
        for _ in 0..self.max_attempts {
            candidate = 10f64.powf(log_min + log_span * rng.next_uniform());
            if rng.next_uniform() <= Self::weight(candidate) {
                return Ok(candidate);
            }
        }
        Err(SpectrumError::SamplingExhausted {
            attempts: self.max_attempts,
            last_candidate: candidate,
        })
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Table(SpectrumTable),
    Analytic(AnalyticSpectrum),
}

/// Where a sampler's spectrum came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumOrigin {
    File,
    Fallback,
    Analytic,
}

/// Draws one primary muon energy (GeV) per call.
#[derive(Debug, Clone)]
pub struct SpectrumSampler {
    shape: Shape,
    origin: SpectrumOrigin,
}

impl SpectrumSampler {
    pub fn from_table(table: SpectrumTable) -> Self {
        Self {
            shape: Shape::Table(table),
            origin: SpectrumOrigin::File,
        }
    }

    pub fn fallback() -> Self {
        Self {
            shape: Shape::Table(SpectrumTable::fallback().clone()),
            origin: SpectrumOrigin::Fallback,
        }
    }

    pub fn analytic(spectrum: AnalyticSpectrum) -> Self {
        Self {
            shape: Shape::Analytic(spectrum),
            origin: SpectrumOrigin::Analytic,
        }
    }

    /// Load `path` when given, degrading to the fallback table on any error.
    pub fn from_file_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("no spectrum file provided, using fallback approximate muon spectrum");
            return Self::fallback();
        };
        match SpectrumTable::load(path) {
            Ok(table) => {
                info!(path = %path.display(), bins = table.len(), "loaded spectrum file");
                Self::from_table(table)
            }
            Err(e) => {
                warn!("{e}; falling back to approximate muon spectrum");
                Self::fallback()
            }
        }
    }

    pub fn origin(&self) -> SpectrumOrigin {
        self.origin
    }

    pub fn table(&self) -> Option<&SpectrumTable> {
        match &self.shape {
            Shape::Table(table) => Some(table),
            Shape::Analytic(_) => None,
        }
    }

    pub fn try_sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Result<f64, SpectrumError> {
        match &self.shape {
            Shape::Table(table) => Ok(table.sample(rng)),
            Shape::Analytic(spectrum) => spectrum.try_sample(rng),
        }
    }

    /// Draw an energy, accepting the last rejected candidate if the analytic
    /// loop runs out of attempts.
    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.try_sample(rng) {
            Ok(energy) => energy,
            Err(SpectrumError::SamplingExhausted { attempts, last_candidate }) => {
                warn!(attempts, last_candidate, "rejection sampling exhausted, using last candidate");
                last_candidate
            }
            Err(e) => {
                warn!("{e}; using minimum spectrum energy");
                ANALYTIC_E_MIN
            }
        }
    }
}
