// Random number sources for spectrum sampling.
//
// Samplers never reach for a global generator: every draw goes through a
// `UniformSource` handed in by the caller, so runs are reproducible from a
// seed and tests can script the exact draws they need.

use rand::{Rng, RngCore, SeedableRng};

/// LCG multiplier (PCG reference constants)
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;
/// Output permutation multiplier (RXS-M-XS)
const PRN_PERMUTE: u64 = 12605985483714917081;

/// A source of uniform draws in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Small PCG-LCG generator used to drive runs.
///
/// The state is a single `u64`; a run seeded with the same value replays
/// the same sequence of draws.
#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    state: u64,
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline(always)]
    fn step(&mut self) -> u64 {
        self.state = PRN_MULT.wrapping_mul(self.state).wrapping_add(PRN_ADD);
        let word = ((self.state >> ((self.state >> 59) + 5)) ^ self.state).wrapping_mul(PRN_PERMUTE);
        (word >> 43) ^ word
    }

    /// Uniform f64 in `[0, 1)`.
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        // 53 high bits -> mantissa, so the result never rounds up to 1.0
        (self.step() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
