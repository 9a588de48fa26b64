// src/processing/harmonics.rs
//! Harmonic-series variance of a magnitude spectrum

use crate::processing::stats::population_variance;
use serde::Serialize;

/// Compares the variance along doubling harmonic series with the variance of
/// the whole spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicVarianceAnalyzer;

/// Spectral and harmonic variance of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HarmonicProfile {
    pub variance: f64,
    pub harmonic_variance: f64,
}

impl HarmonicProfile {
    /// `harmonic_variance / variance`
    pub fn ratio(&self) -> f64 {
        self.harmonic_variance / self.variance
    }

    /// `harmonic_variance - variance`
    pub fn difference(&self) -> f64 {
        self.harmonic_variance - self.variance
    }
}

impl HarmonicVarianceAnalyzer {
    /// Population variance of the whole spectrum
    pub fn variance(&self, spectrum: &[f64]) -> f64 {
        population_variance(spectrum)
    }

    /// Mean variance of the harmonic series `base, 2·base, 4·base, …`
    /// (1-based positions, up to the spectrum length) over every base
    /// `1..len` whose series has at least two members.
    ///
    /// `NaN` when no base qualifies.
    pub fn harmonic_variance(&self, spectrum: &[f64]) -> f64 {
        let len = spectrum.len();
        let mut total = 0.0;
        let mut qualifying = 0usize;
        let mut series = Vec::new();

        for base in 1..len {
            series.clear();
            let mut position = base;
            while position <= len {
                series.push(spectrum[position - 1]);
                position *= 2;
            }

            if series.len() >= 2 {
                total += population_variance(&series);
                qualifying += 1;
            }
        }

        // 0/0 yields NaN
        total / qualifying as f64
    }

    pub fn profile(&self, spectrum: &[f64]) -> HarmonicProfile {
        HarmonicProfile {
            variance: self.variance(spectrum),
            harmonic_variance: self.harmonic_variance(spectrum),
        }
    }
}
