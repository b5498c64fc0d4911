use crate::fast_rng::UniformSource;
use crate::particle::Particle;
use crate::spectrum::SpectrumSampler;
use crate::units::m_to_cm;

pub const DEFAULT_START_Z_M: f64 = 25.0;

/// Vertically down-going muon gun above the detector center.
#[derive(Debug, Clone)]
pub struct MuonSource {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub spectrum: SpectrumSampler,
}

impl MuonSource {
    pub fn new(spectrum: SpectrumSampler, start_z_m: f64) -> Self {
        Self {
            position: [0.0, 0.0, m_to_cm(start_z_m)],
            direction: [0.0, 0.0, -1.0],
            spectrum,
        }
    }

    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Particle {
        let energy = self.spectrum.sample(rng);
        Particle::new(self.position, self.direction, energy)
    }
}
