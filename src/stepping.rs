use crate::fiducial::FiducialVolume;
use crate::particle::{Step, TrackRole};
use crate::tally::RunStatistics;

/// Turns transport steps into fiducial-volume tallies.
///
/// Primary path length is credited when the step midpoint lies in the
/// volume. Secondaries are counted where they are created, on any track.
#[derive(Debug, Clone, Copy)]
pub struct StepRecorder {
    fiducial: FiducialVolume,
}

impl StepRecorder {
    pub fn new(fiducial: FiducialVolume) -> Self {
        Self { fiducial }
    }

    pub fn fiducial(&self) -> &FiducialVolume {
        &self.fiducial
    }

    pub fn record(&self, step: &Step, stats: &mut RunStatistics) {
        if step.track == TrackRole::Primary && self.fiducial.contains(step.midpoint()) {
            stats.add_path_length(step.length.max(0.0));
        }

        for secondary in &step.secondaries {
            if !self.fiducial.contains(secondary.position) {
                continue;
            }
            stats.increment_secondary(&secondary.species);
            if let Some(nucleus) = secondary.nucleus {
                stats.increment_isotope(&secondary.species, nucleus.a, nucleus.z);
            }
        }
    }
}
