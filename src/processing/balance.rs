// src/processing/balance.rs
//! Hemispheric, front/back, delta/gamma and harmonic power balances

use crate::processing::bands::{Band, BandPowerTable};
use crate::processing::harmonics::HarmonicVarianceAnalyzer;
use crate::processing::spatial::Direction;
use crate::processing::spectrum::SpectrumSnapshot;
use crate::types::Electrode;
use serde::Serialize;

/// Two competing powers; `b` is the side plotted upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerBalance {
    pub a: f64,
    pub b: f64,
}

impl PowerBalance {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// `b - a`
    pub fn difference(&self) -> f64 {
        self.b - self.a
    }

    /// `b / a`; infinite or `NaN` when `a` is zero
    pub fn ratio(&self) -> f64 {
        self.b / self.a
    }
}

/// Sum of the scalp electrodes in `values` (indexed by electrode) that face
/// `direction`; non-finite entries are skipped
pub fn directional_power(values: &[f64], direction: Direction) -> f64 {
    Electrode::SCALP
        .iter()
        .filter(|&&electrode| {
            Direction::of(electrode).is_some_and(|directions| directions.contains(&direction))
        })
        .filter_map(|electrode| values.get(electrode.index()))
        .filter(|value| value.is_finite())
        .sum()
}

/// All balances derivable for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBalances {
    /// Per band, a = left, b = right
    pub right_vs_left: Vec<(Band, PowerBalance)>,
    /// Per band, a = back, b = front
    pub front_vs_back: Vec<(Band, PowerBalance)>,
    /// Per scalp electrode, a = gamma, b = delta
    pub delta_vs_gamma: Vec<(Electrode, PowerBalance)>,
    /// Per scalp electrode, a = spectral variance, b = harmonic variance.
    /// Empty without an EEG spectrum.
    pub harmonic: Vec<(Electrode, PowerBalance)>,
}

impl PowerBalances {
    /// Balances from a band table and, when present, the EEG spectrum
    pub fn compute(table: &BandPowerTable, spectrum: Option<&SpectrumSnapshot>) -> Self {
        let directional = |a: Direction, b: Direction| -> Vec<(Band, PowerBalance)> {
            Band::ALL
                .iter()
                .filter_map(|&band| {
                    let values = table.band(band)?;
                    Some((
                        band,
                        PowerBalance::new(directional_power(values, a), directional_power(values, b)),
                    ))
                })
                .collect()
        };

        let delta_vs_gamma = Electrode::SCALP
            .iter()
            .filter_map(|&electrode| {
                let gamma = table.get(Band::Gamma, electrode.index())?;
                let delta = table.get(Band::Delta, electrode.index())?;
                Some((electrode, PowerBalance::new(gamma, delta)))
            })
            .collect();

        let harmonic = spectrum
            .map(|spectrum| {
                Electrode::SCALP
                    .iter()
                    .filter_map(|&electrode| {
                        let magnitudes = spectrum.channel_vec(electrode.index())?;
                        let profile = HarmonicVarianceAnalyzer.profile(&magnitudes);
                        Some((electrode, PowerBalance::new(profile.variance, profile.harmonic_variance)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            right_vs_left: directional(Direction::Left, Direction::Right),
            front_vs_back: directional(Direction::Back, Direction::Front),
            delta_vs_gamma,
            harmonic,
        }
    }
}
