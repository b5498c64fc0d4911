//! End-of-run yield report.
//!
//! Yields are `(count / events) / (density * average path length)`, i.e. per
//! muon per g/cm^2 of traversed water, and are displayed multiplied by 1e7.

use std::fmt;
use std::io::{self, Write};

use crate::tally::{IsotopeKey, RunStatistics};
use crate::units::YIELD_DISPLAY_SCALE;

/// Significant digits used for floating-point report values.
const REPORT_DIGITS: usize = 6;

/// One row of a yield table.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldLine<K> {
    pub key: K,
    pub count: u64,
    /// Yield in units of 1e-7 g^-1 cm^2 per muon, `None` when it cannot be normalized.
    pub yield_e7: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldSummary {
    pub events: u64,
    pub density: f64,
    pub total_path_length_cm: f64,
    pub avg_path_length_cm: f64,
    pub total_secondaries: u64,
    pub total_yield_e7: Option<f64>,
    pub secondaries: Vec<YieldLine<String>>,
    pub total_isotopes: u64,
    pub isotopes: Vec<YieldLine<IsotopeKey>>,
}

impl YieldSummary {
    pub fn is_normalized(&self) -> bool {
        self.total_yield_e7.is_some()
    }

    pub fn secondary(&self, species: &str) -> Option<&YieldLine<String>> {
        self.secondaries.iter().find(|line| line.key == species)
    }
}

/// Report computed from a finalized [`RunStatistics`].
#[derive(Debug, Clone, PartialEq)]
pub enum YieldReport {
    NoEvents,
    Summary(YieldSummary),
}

impl YieldReport {
    /// Build the report. `density` is in g/cm^3. The statistics are only read.
    pub fn from_statistics(stats: &RunStatistics, density: f64) -> Self {
        let events = stats.event_count();
        if events == 0 {
            return YieldReport::NoEvents;
        }

        let total_path = stats.total_path_length_cm();
        let avg_path = total_path / events as f64;
        let mass_thickness = density * avg_path;

        let normalize = |count: u64| -> Option<f64> {
            if avg_path > 0.0 && density > 0.0 {
                Some(count as f64 / events as f64 / mass_thickness * YIELD_DISPLAY_SCALE)
            } else {
                None
            }
        };

        let secondaries = stats
            .secondary_counts()
            .iter()
            .map(|(species, &count)| YieldLine {
                key: species.clone(),
                count,
                yield_e7: normalize(count),
            })
            .collect();
        let isotopes = stats
            .isotopes_sorted()
            .into_iter()
            .map(|(key, count)| YieldLine {
                key,
                count,
                yield_e7: normalize(count),
            })
            .collect();

        let total_secondaries = stats.total_secondaries();
        YieldReport::Summary(YieldSummary {
            events,
            density,
            total_path_length_cm: total_path,
            avg_path_length_cm: avg_path,
            total_secondaries,
            total_yield_e7: normalize(total_secondaries),
            secondaries,
            total_isotopes: stats.total_isotopes(),
            isotopes,
        })
    }

    pub fn summary(&self) -> Option<&YieldSummary> {
        match self {
            YieldReport::NoEvents => None,
            YieldReport::Summary(summary) => Some(summary),
        }
    }

    pub fn write_report<W: Write>(&self, mut sink: W) -> io::Result<()> {
        write!(sink, "{self}")
    }
}

/// Render the report for `stats` as text.
pub fn render(stats: &RunStatistics, density: f64) -> String {
    YieldReport::from_statistics(stats, density).to_string()
}

/// Format with six significant digits, dropping trailing zeros.
pub fn significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = REPORT_DIGITS as i32 - 1 - magnitude;
    if decimals > 0 {
        let text = format!("{:.*}", decimals as usize, value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        let scale = 10f64.powi(-decimals);
        format!("{:.0}", (value / scale).round() * scale)
    }
}

fn yield_text(yield_e7: Option<f64>) -> String {
    yield_e7.map(significant).unwrap_or_else(|| "n/a".to_string())
}

impl fmt::Display for YieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            YieldReport::NoEvents => return writeln!(f, "No events run."),
            YieldReport::Summary(s) => s,
        };

        writeln!(f, "==== Run Summary ====")?;
        writeln!(f, "Events (muons) = {}", s.events)?;
        writeln!(f, "Total muon path length inside FV (cm) = {}", significant(s.total_path_length_cm))?;
        writeln!(
            f,
            "Average muon path length in FV per muon (cm) = {}",
            significant(s.avg_path_length_cm)
        )?;
        writeln!(f)?;

        writeln!(f, "Total secondaries produced inside FV = {}", s.total_secondaries)?;
        match s.total_yield_e7 {
            Some(y) => writeln!(
                f,
                "Yield (all secondaries) = {}  (10^-7 g^-1 cm^2 mu^-1)",
                significant(y)
            )?,
            None if !(s.avg_path_length_cm > 0.0) => {
                writeln!(f, "Average path length = 0; cannot normalize.")?
            }
            None => writeln!(f, "Density = {}; cannot normalize.", significant(s.density))?,
        }
        writeln!(f)?;

        writeln!(f, "Secondary counts by particle:")?;
        for line in &s.secondaries {
            writeln!(
                f,
                "{:>20} : {:>12} ; Yield(1e-7) = {:>10}",
                line.key,
                line.count,
                yield_text(line.yield_e7)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Spallation isotope / ion yields (inside FV):")?;
        writeln!(f, "Total isotopes recorded = {}", s.total_isotopes)?;
        for line in &s.isotopes {
            writeln!(
                f,
                "  A={:>3} Z={:>3} count={:>10} ; Yield(1e-7)={:>10}",
                line.key.a,
                line.key.z,
                line.count,
                yield_text(line.yield_e7)
            )?;
        }
        writeln!(f, "==== End of Run ====")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutron_run() -> RunStatistics {
        let mut stats = RunStatistics::new();
        stats.set_event_count(100);
        stats.add_path_length(500.0);
        for _ in 0..50 {
            stats.increment_secondary("neutron");
        }
        stats
    }

    #[test]
    fn test_no_events() {
        let mut stats = RunStatistics::new();
        stats.increment_secondary("neutron");
        let report = YieldReport::from_statistics(&stats, 1.0);
        assert_eq!(report, YieldReport::NoEvents);
        assert_eq!(report.to_string(), "No events run.\n");
    }

    #[test]
    fn test_neutron_yield() {
        let report = YieldReport::from_statistics(&neutron_run(), 1.0);
        let s = report.summary().unwrap();
        assert_eq!(s.avg_path_length_cm, 5.0);
        let neutron = s.secondary("neutron").unwrap();
        assert_eq!(neutron.count, 50);
        assert!((neutron.yield_e7.unwrap() - 1.0e6).abs() < 1e-6);
        assert!((s.total_yield_e7.unwrap() - 1.0e6).abs() < 1e-6);

        let text = report.to_string();
        assert!(text.contains("Yield (all secondaries) = 1000000  (10^-7 g^-1 cm^2 mu^-1)"));
        assert!(text.contains("neutron :           50 ; Yield(1e-7) =    1000000"));
        assert!(text.ends_with("==== End of Run ====\n"));
    }

    #[test]
    fn test_density_scales_yield() {
        let report = YieldReport::from_statistics(&neutron_run(), 2.0);
        let y = report.summary().unwrap().total_yield_e7.unwrap();
        assert!((y - 5.0e5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_path_length_reports_totals_only() {
        let mut stats = RunStatistics::new();
        stats.set_event_count(10);
        stats.increment_secondary("gamma");
        stats.increment_isotope("C11", 11, 6);

        let report = YieldReport::from_statistics(&stats, 1.0);
        let s = report.summary().unwrap();
        assert!(!s.is_normalized());
        assert!(s.secondaries.iter().all(|l| l.yield_e7.is_none()));
        assert!(s.isotopes.iter().all(|l| l.yield_e7.is_none()));

        let text = report.to_string();
        assert!(text.contains("Total secondaries produced inside FV = 1"));
        assert!(text.contains("cannot normalize"));
        assert!(text.contains("n/a"));
        assert!(!text.contains("inf") && !text.contains("NaN"));
    }

    #[test]
    fn test_non_positive_density_names_density() {
        let report = YieldReport::from_statistics(&neutron_run(), 0.0);
        let s = report.summary().unwrap();
        assert!(!s.is_normalized());
        assert_eq!(s.avg_path_length_cm, 5.0);

        let text = report.to_string();
        assert!(text.contains("Density = 0; cannot normalize."));
        assert!(!text.contains("Average path length = 0"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_isotope_rows_sorted() {
        let mut stats = neutron_run();
        for _ in 0..3 {
            stats.increment_isotope("N16", 16, 7);
        }
        for _ in 0..2 {
            stats.increment_isotope("N15", 15, 7);
        }

        let text = render(&stats, 1.0);
        let first = text.find("A= 15 Z=  7 count=         2").unwrap();
        let second = text.find("A= 16 Z=  7 count=         3").unwrap();
        assert!(first < second);
        assert!(text.contains("Total isotopes recorded = 5"));
    }

    #[test]
    fn test_report_does_not_mutate_statistics() {
        let stats = neutron_run();
        let before = stats.clone();
        let _ = render(&stats, 1.0);
        assert_eq!(stats, before);
    }

    #[test]
    fn test_write_report_to_sink() {
        let mut buffer = Vec::new();
        YieldReport::from_statistics(&neutron_run(), 1.0)
            .write_report(&mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("==== Run Summary ====\n"));
    }

    #[test]
    fn test_significant_digits() {
        assert_eq!(significant(1.0e6), "1000000");
        assert_eq!(significant(0.1), "0.1");
        assert_eq!(significant(1234.5678), "1234.57");
        assert_eq!(significant(5.0), "5");
        assert_eq!(significant(0.0), "0");
        assert_eq!(significant(123456789.0), "123457000");
    }
}
