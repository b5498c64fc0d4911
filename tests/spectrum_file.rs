// Integration tests for reading muon spectrum files and sampling from them
use std::io::Write;

use muon_yield::spectrum::{SpectrumOrigin, FALLBACK_BINS};
use muon_yield::{FastRng, SpectrumError, SpectrumSampler, SpectrumTable, UniformSource};
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn spectrum_file(contents: &str) -> NamedTempFile {
    spectrum_file_bytes(contents.as_bytes())
}

fn spectrum_file_bytes(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// Hands out a fixed draw every call.
struct Constant(f64);

impl UniformSource for Constant {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

#[test]
fn test_two_line_file() {
    let file = spectrum_file("10 1\n20 1\n");
    let table = SpectrumTable::load(file.path()).unwrap();

    assert_eq!(table.energies(), &[10.0, 20.0]);
    assert_eq!(table.cdf(), &[0.5, 1.0]);

    let sampler = SpectrumSampler::from_table(table);
    assert_eq!(sampler.sample(&mut Constant(0.3)), 10.0);
    assert_eq!(sampler.sample(&mut Constant(0.7)), 20.0);
}

#[test]
fn test_comments_blank_and_bad_rows_skipped() {
    let file = spectrum_file(
        "# E[GeV] weight\n\
         \n\
         5 2\n\
         not a number\n\
         -3 10\n\
         0 10\n\
         15\n\
         25 2 extra columns\n",
    );
    let table = SpectrumTable::load(file.path()).unwrap();
    assert_eq!(table.energies(), &[5.0, 25.0]);
    assert_eq!(table.cdf(), &[0.5, 1.0]);
}

#[test]
fn test_non_utf8_lines_skipped() {
    let file = spectrum_file_bytes(b"# measured at 2700 m.w.e. \xff\xfe\n10 1\n\xe9 5\n20 1\n");
    let table = SpectrumTable::load(file.path()).unwrap();
    assert_eq!(table.energies(), &[10.0, 20.0]);
    assert_eq!(table.cdf(), &[0.5, 1.0]);

    let sampler = SpectrumSampler::from_file_or_fallback(Some(file.path()));
    assert_eq!(sampler.origin(), SpectrumOrigin::File);
}

#[test]
fn test_crlf_line_endings() {
    let file = spectrum_file("# header\r\n10 1\r\n20 3\r\n");
    let table = SpectrumTable::load(file.path()).unwrap();
    assert_eq!(table.energies(), &[10.0, 20.0]);
    assert_eq!(table.cdf(), &[0.25, 1.0]);
}

#[test]
fn test_file_order_preserved() {
    let file = spectrum_file("300 1\n10 1\n100 2\n");
    let table = SpectrumTable::load(file.path()).unwrap();
    assert_eq!(table.energies(), &[300.0, 10.0, 100.0]);
    assert_eq!(table.invert(0.2), 300.0);
    assert_eq!(table.invert(0.4), 10.0);
    assert_eq!(table.invert(0.9), 100.0);
}

#[test]
fn test_empty_file_is_invalid() {
    let file = spectrum_file("# only a comment\n\n");
    assert!(matches!(
        SpectrumTable::load(file.path()),
        Err(SpectrumError::EmptyOrInvalidSpectrum { .. })
    ));
}

#[test]
fn test_zero_weight_sum_is_invalid() {
    let file = spectrum_file("10 0\n20 0\n");
    assert!(matches!(
        SpectrumTable::load(file.path()),
        Err(SpectrumError::EmptyOrInvalidSpectrum { .. })
    ));
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.dat");
    assert!(matches!(
        SpectrumTable::load(&missing),
        Err(SpectrumError::FileUnreadable { .. })
    ));
}

#[test]
fn test_sampler_degrades_to_fallback() {
    let file = spectrum_file("10 -1\n");
    let sampler = SpectrumSampler::from_file_or_fallback(Some(file.path()));
    assert_eq!(sampler.origin(), SpectrumOrigin::Fallback);
    assert_eq!(sampler.table().unwrap().len(), FALLBACK_BINS);

    let good = spectrum_file("10 1\n");
    let sampler = SpectrumSampler::from_file_or_fallback(Some(good.path()));
    assert_eq!(sampler.origin(), SpectrumOrigin::File);
}

#[test]
fn test_sample_frequencies_follow_weights() {
    let file = spectrum_file("10 1\n20 2\n40 7\n");
    let sampler = SpectrumSampler::from_table(SpectrumTable::load(file.path()).unwrap());
    let mut rng = FastRng::new(2024);

    let n = 200_000;
    let mut counts = [0usize; 3];
    for _ in 0..n {
        match sampler.sample(&mut rng) {
            e if e == 10.0 => counts[0] += 1,
            e if e == 20.0 => counts[1] += 1,
            e if e == 40.0 => counts[2] += 1,
            e => panic!("sampled energy {} not in table", e),
        }
    }

    for (count, expected) in counts.iter().zip([0.1, 0.2, 0.7]) {
        let freq = *count as f64 / n as f64;
        assert!((freq - expected).abs() < 0.01, "frequency {} vs {}", freq, expected);
    }
}

#[test]
fn test_fallback_mean_energy() {
    // the fallback histogram is steep: most muons are below 100 GeV
    let sampler = SpectrumSampler::fallback();
    let mut rng = FastRng::new(7);
    let n = 50_000;
    let below_100 = (0..n).filter(|_| sampler.sample(&mut rng) < 100.0).count();
    assert!(below_100 as f64 / n as f64 > 0.8);
}

proptest! {
    #[test]
    fn prop_cdf_is_normalized_and_monotonic(
        rows in prop::collection::vec((0.01f64..1.0e4, 0.0f64..100.0), 1..64)
    ) {
        let (energies, weights): (Vec<f64>, Vec<f64>) = rows.into_iter().unzip();
        prop_assume!(weights.iter().sum::<f64>() > 0.0);

        let table = SpectrumTable::from_weights(energies.clone(), &weights).unwrap();
        prop_assert_eq!(table.len(), energies.len());
        prop_assert!((table.cdf()[table.len() - 1] - 1.0).abs() < 1e-9);
        prop_assert!(table.cdf().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_invert_returns_member(
        rows in prop::collection::vec((0.01f64..1.0e4, 0.001f64..100.0), 1..64),
        u in 0.0f64..1.0
    ) {
        let (energies, weights): (Vec<f64>, Vec<f64>) = rows.into_iter().unzip();
        let table = SpectrumTable::from_weights(energies.clone(), &weights).unwrap();
        prop_assert!(energies.contains(&table.invert(u)));
    }
}
