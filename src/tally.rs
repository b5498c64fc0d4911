use std::collections::{BTreeMap, HashMap};

use crate::particle::Nucleus;

/// Isotope identity used for counting, ordered by A then Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsotopeKey {
    pub a: u32,
    pub z: u32,
}

impl IsotopeKey {
    pub fn new(a: u32, z: u32) -> Self {
        Self { a, z }
    }
}

impl From<Nucleus> for IsotopeKey {
    fn from(nucleus: Nucleus) -> Self {
        Self::new(nucleus.a, nucleus.z)
    }
}

/// Per-run counters fed by the stepping rules.
///
/// Holds raw totals only; yields are derived by [`crate::report::YieldReport`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    event_count: u64,
    total_path_length_cm: f64,
    secondary_counts: BTreeMap<String, u64>,
    isotope_counts: HashMap<IsotopeKey, u64>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.event_count = 0;
        self.total_path_length_cm = 0.0;
        self.secondary_counts.clear();
        self.isotope_counts.clear();
    }

    /// Add a fiducial segment of the primary track. Callers pass `length_cm >= 0`.
    pub fn add_path_length(&mut self, length_cm: f64) {
        debug_assert!(length_cm >= 0.0, "negative path length {length_cm}");
        self.total_path_length_cm += length_cm;
    }

    pub fn increment_secondary(&mut self, species: &str) {
        match self.secondary_counts.get_mut(species) {
            Some(count) => *count += 1,
            None => {
                self.secondary_counts.insert(species.to_string(), 1);
            }
        }
    }

    /// Count one nucleus. Isotopes are keyed by `(a, z)` alone; the species
    /// name is accepted for symmetry with [`increment_secondary`](Self::increment_secondary).
    pub fn increment_isotope(&mut self, _species: &str, a: u32, z: u32) {
        *self.isotope_counts.entry(IsotopeKey::new(a, z)).or_insert(0) += 1;
    }

    pub fn set_event_count(&mut self, events: u64) {
        self.event_count = events;
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn total_path_length_cm(&self) -> f64 {
        self.total_path_length_cm
    }

    /// Species counts in key order.
    pub fn secondary_counts(&self) -> &BTreeMap<String, u64> {
        &self.secondary_counts
    }

    pub fn secondary_count(&self, species: &str) -> u64 {
        self.secondary_counts.get(species).copied().unwrap_or(0)
    }

    pub fn isotope_count(&self, a: u32, z: u32) -> u64 {
        self.isotope_counts
            .get(&IsotopeKey::new(a, z))
            .copied()
            .unwrap_or(0)
    }

    /// Isotope counts sorted by `(A, Z)`.
    pub fn isotopes_sorted(&self) -> Vec<(IsotopeKey, u64)> {
        let mut isotopes: Vec<(IsotopeKey, u64)> =
            self.isotope_counts.iter().map(|(&k, &v)| (k, v)).collect();
        isotopes.sort_unstable_by_key(|&(key, _)| key);
        isotopes
    }

    pub fn total_secondaries(&self) -> u64 {
        self.secondary_counts.values().sum()
    }

    pub fn total_isotopes(&self) -> u64 {
        self.isotope_counts.values().sum()
    }
}
