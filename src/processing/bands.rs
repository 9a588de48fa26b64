// src/processing/bands.rs
//! EEG frequency bands and band power extraction

use crate::config::{BandAggregation, BandPowerSource};
use crate::processing::spectrum::SpectrumSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named EEG frequency band, ordered by increasing frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    /// All bands, lowest frequency first
    pub const ALL: [Band; 5] = [Band::Delta, Band::Theta, Band::Alpha, Band::Beta, Band::Gamma];

    /// `(low, high)` edges in Hz
    pub fn range_hz(self) -> (f64, f64) {
        match self {
            Band::Delta => (1.0, 4.0),
            Band::Theta => (4.0, 8.0),
            Band::Alpha => (8.0, 12.0),
            Band::Beta => (12.0, 30.0),
            Band::Gamma => (30.0, 80.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Band::Delta => "delta",
            Band::Theta => "theta",
            Band::Alpha => "alpha",
            Band::Beta => "beta",
            Band::Gamma => "gamma",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Band::Delta => 'δ',
            Band::Theta => 'θ',
            Band::Alpha => 'α',
            Band::Beta => 'β',
            Band::Gamma => 'γ',
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Band power per (band, channel)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandPowerTable {
    powers: BTreeMap<Band, Vec<f64>>,
}

impl BandPowerTable {
    /// Accept an already-aggregated table, e.g. from upstream
    pub fn from_map(powers: BTreeMap<Band, Vec<f64>>) -> Self {
        Self { powers }
    }

    /// Power of one band on one channel
    pub fn get(&self, band: Band, channel: usize) -> Option<f64> {
        self.powers.get(&band).and_then(|values| values.get(channel)).copied()
    }

    /// Per-channel powers of one band
    pub fn band(&self, band: Band) -> Option<&[f64]> {
        self.powers.get(&band).map(Vec::as_slice)
    }

    /// Powers of every band for one channel, lowest band first.
    ///
    /// `None` if any band lacks the channel.
    pub fn channel_profile(&self, channel: usize) -> Option<Vec<f64>> {
        Band::ALL.iter().map(|&band| self.get(band, channel)).collect()
    }

    /// True when every band is present
    pub fn is_complete(&self) -> bool {
        Band::ALL.iter().all(|band| self.powers.contains_key(band))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Band, &Vec<f64>)> {
        self.powers.iter()
    }
}

/// Collapses spectrum buckets into one power value per (band, channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPowerExtractor {
    aggregation: BandAggregation,
}

impl BandPowerExtractor {
    pub fn new(aggregation: BandAggregation) -> Self {
        Self { aggregation }
    }

    /// Power of `band` on `channel`.
    ///
    /// Member buckets satisfy `low <= f < high`. Non-finite magnitudes are
    /// skipped; a band with no finite member yields `0.0`, as does an unknown
    /// channel.
    pub fn power(&self, spectrum: &SpectrumSnapshot, band: Band, channel: usize) -> f64 {
        let Some(column) = spectrum.channel(channel) else {
            return 0.0;
        };
        let (low, high) = band.range_hz();
        let range = spectrum.half_open_range(low, high);

        let members: Vec<f64> = column
            .iter()
            .skip(range.start)
            .take(range.len())
            .map(|m| m.abs())
            .filter(|m| m.is_finite())
            .collect();

        if members.is_empty() {
            return 0.0;
        }

        match self.aggregation {
            BandAggregation::Max => members.iter().copied().fold(0.0, f64::max),
            BandAggregation::Mean => members.iter().sum::<f64>() / members.len() as f64,
            BandAggregation::Sum => members.iter().sum(),
        }
    }

    /// Powers of every band on every channel of `spectrum`
    pub fn table(&self, spectrum: &SpectrumSnapshot) -> BandPowerTable {
        let powers = Band::ALL
            .iter()
            .map(|&band| {
                let values: Vec<f64> = (0..spectrum.channel_count())
                    .map(|channel| self.power(spectrum, band, channel))
                    .collect();
                (band, values)
            })
            .collect();

        BandPowerTable { powers }
    }

    /// Pick the tick's band table according to `source`
    pub fn resolve(
        &self,
        source: BandPowerSource,
        upstream: Option<&BandPowerTable>,
        spectrum: Option<&SpectrumSnapshot>,
    ) -> Option<BandPowerTable> {
        match (source, upstream) {
            (BandPowerSource::PreferUpstream, Some(table)) => Some(table.clone()),
            _ => spectrum.map(|s| self.table(s)),
        }
    }
}
