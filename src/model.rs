use tracing::{debug, info};

use crate::error::SettingsError;
use crate::fast_rng::{FastRng, UniformSource};
use crate::report::YieldReport;
use crate::settings::Settings;
use crate::source::MuonSource;
use crate::spectrum::{AnalyticSpectrum, SpectrumSampler};
use crate::stepping::StepRecorder;
use crate::tally::RunStatistics;
use crate::transport::TransportHost;

/// Drives one run: resets the statistics, pushes each sampled muon through
/// the transport host and builds the yield report at the end.
#[derive(Debug, Clone)]
pub struct Model {
    pub settings: Settings,
    source: MuonSource,
    recorder: StepRecorder,
    statistics: RunStatistics,
}

impl Model {
    /// Build the run from validated settings. Spectrum problems never fail
    /// here: they degrade to the fallback table.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let spectrum = if settings.analytic_spectrum {
            SpectrumSampler::analytic(AnalyticSpectrum {
                max_attempts: settings.max_rejection_attempts,
            })
        } else {
            SpectrumSampler::from_file_or_fallback(settings.spectrum_file.as_deref())
        };
        Self::with_spectrum(settings, spectrum)
    }

    /// Build the run around an already constructed spectrum.
    pub fn with_spectrum(settings: Settings, spectrum: SpectrumSampler) -> Result<Self, SettingsError> {
        let fiducial = settings.fiducial_volume()?;
        Ok(Self {
            source: MuonSource::new(spectrum, settings.start_z_m),
            recorder: StepRecorder::new(fiducial),
            statistics: RunStatistics::new(),
            settings,
        })
    }

    pub fn source(&self) -> &MuonSource {
        &self.source
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    pub fn begin_run(&mut self) {
        self.statistics.reset();
    }

    /// Sample one primary and transport it, tallying every reported step.
    pub fn process_event<H, R>(&mut self, host: &mut H, rng: &mut R)
    where
        H: TransportHost + ?Sized,
        R: UniformSource + ?Sized,
    {
        let primary = self.source.sample(rng);
        debug!(energy_gev = primary.energy, "transporting primary muon");

        let recorder = self.recorder;
        let statistics = &mut self.statistics;
        host.transport(primary, &mut |step| recorder.record(step, statistics));
    }

    pub fn end_run(&mut self, events: u64) -> YieldReport {
        self.statistics.set_event_count(events);
        let report = YieldReport::from_statistics(&self.statistics, self.settings.density);
        info!(
            events,
            path_cm = self.statistics.total_path_length_cm(),
            secondaries = self.statistics.total_secondaries(),
            isotopes = self.statistics.total_isotopes(),
            "run finished"
        );
        report
    }

    pub fn run<H, R>(&mut self, host: &mut H, rng: &mut R) -> YieldReport
    where
        H: TransportHost + ?Sized,
        R: UniformSource + ?Sized,
    {
        let events = self.settings.events;
        info!(events, "starting run");
        self.begin_run();
        for _ in 0..events {
            self.process_event(host, rng);
        }
        self.end_run(events)
    }

    /// Run with a [`FastRng`] seeded from the settings.
    pub fn run_seeded<H: TransportHost + ?Sized>(&mut self, host: &mut H) -> YieldReport {
        let mut rng = FastRng::new(self.settings.seed);
        self.run(host, &mut rng)
    }
}
