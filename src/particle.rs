//! Particle and step records exchanged with the transport host.
//!
//! Positions and lengths are in centimeters, energies in GeV.

/// The primary muon as handed to the transport host.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub energy: f64,
    pub alive: bool,
}

impl Particle {
    pub fn new(position: [f64; 3], direction: [f64; 3], energy: f64) -> Self {
        Self {
            position,
            direction,
            energy,
            alive: true,
        }
    }

    pub fn move_by(&mut self, distance: f64) {
        for i in 0..3 {
            self.position[i] += self.direction[i] * distance;
        }
    }
}

/// Mass and atomic number of a nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nucleus {
    pub a: u32,
    pub z: u32,
}

/// A particle created during a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Secondary {
    pub species: String,
    pub position: [f64; 3],
    /// Set when the secondary is an ion or nucleus.
    pub nucleus: Option<Nucleus>,
}

impl Secondary {
    pub fn new(species: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            species: species.into(),
            position,
            nucleus: None,
        }
    }

    pub fn nucleus(species: impl Into<String>, position: [f64; 3], a: u32, z: u32) -> Self {
        Self {
            species: species.into(),
            position,
            nucleus: Some(Nucleus { a, z }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRole {
    Primary,
    Secondary,
}

/// One transport step as observed by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub track: TrackRole,
    pub pre: [f64; 3],
    pub post: [f64; 3],
    pub length: f64,
    pub secondaries: Vec<Secondary>,
}

impl Step {
    pub fn primary(pre: [f64; 3], post: [f64; 3], length: f64) -> Self {
        Self {
            track: TrackRole::Primary,
            pre,
            post,
            length,
            secondaries: Vec::new(),
        }
    }

    pub fn midpoint(&self) -> [f64; 3] {
        [
            0.5 * (self.pre[0] + self.post[0]),
            0.5 * (self.pre[1] + self.post[1]),
            0.5 * (self.pre[2] + self.post[2]),
        ]
    }
}
