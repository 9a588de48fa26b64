// src/processing/spatial.rs
//! "Center of mass" of scalp activity from the four headband electrodes
//!
//! Each electrode feeds two of four directional accumulators:
//!
//! | electrode | accumulators   |
//! |-----------|----------------|
//! | TP9       | back, left     |
//! | AF7       | front, left    |
//! | AF8       | front, right   |
//! | TP10      | back, right    |
//!
//! The point is `x = right - left`, `y = back - front`, and the magnitude is
//! the sum of all four accumulators. This is a coarse heuristic, not source
//! localization.

use crate::processing::bands::{Band, BandPowerTable};
use crate::types::Electrode;
use serde::Serialize;

/// Direction on the scalp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
}

impl Direction {
    /// The two accumulators an electrode contributes to
    pub fn of(electrode: Electrode) -> Option<[Direction; 2]> {
        match electrode {
            Electrode::Tp9 => Some([Direction::Back, Direction::Left]),
            Electrode::Af7 => Some([Direction::Front, Direction::Left]),
            Electrode::Af8 => Some([Direction::Front, Direction::Right]),
            Electrode::Tp10 => Some([Direction::Back, Direction::Right]),
            Electrode::RightAux => None,
        }
    }
}

/// Directional accumulators, all non-negative
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DirectionalWeights {
    pub front: f64,
    pub back: f64,
    pub left: f64,
    pub right: f64,
}

impl DirectionalWeights {
    /// Add `weight` to both accumulators of `electrode`
    pub fn add(&mut self, electrode: Electrode, weight: f64) {
        let Some(directions) = Direction::of(electrode) else {
            return;
        };
        for direction in directions {
            match direction {
                Direction::Front => self.front += weight,
                Direction::Back => self.back += weight,
                Direction::Left => self.left += weight,
                Direction::Right => self.right += weight,
            }
        }
    }

    pub fn point(&self) -> SpatialWeight {
        SpatialWeight {
            x: self.right - self.left,
            y: self.back - self.front,
            magnitude: self.front + self.back + self.left + self.right,
        }
    }
}

/// A 2D activity location and its total weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpatialWeight {
    /// Right minus left
    pub x: f64,
    /// Back minus front
    pub y: f64,
    /// Sum of the four accumulators
    pub magnitude: f64,
}

/// One point for all bands combined plus one per band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialMap {
    pub all: SpatialWeight,
    pub per_band: Vec<(Band, SpatialWeight)>,
}

impl SpatialMap {
    pub fn band(&self, band: Band) -> Option<SpatialWeight> {
        self.per_band.iter().find(|(b, _)| *b == band).map(|(_, w)| *w)
    }
}

/// Projects per-electrode power onto the scalp axes
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialWeightEstimator;

impl SpatialWeightEstimator {
    /// Point for one power vector per scalp electrode.
    ///
    /// Each electrode's weight is the mean absolute value of the finite entries
    /// of its vector; a vector without any contributes nothing.
    pub fn estimate(&self, powers: &[(Electrode, &[f64])]) -> SpatialWeight {
        let mut weights = DirectionalWeights::default();
        for &(electrode, values) in powers {
            weights.add(electrode, mean_abs(values));
        }
        weights.point()
    }

    /// Point for a single power value per scalp electrode
    pub fn estimate_scalar(&self, powers: &[(Electrode, f64)]) -> SpatialWeight {
        let mut weights = DirectionalWeights::default();
        for &(electrode, value) in powers.iter().filter(|(_, v)| v.is_finite()) {
            weights.add(electrode, value.abs());
        }
        weights.point()
    }

    /// Combined and per-band points from a band table.
    ///
    /// `None` unless every band carries all four scalp electrodes.
    pub fn map(&self, table: &BandPowerTable) -> Option<SpatialMap> {
        let profiles: Vec<(Electrode, Vec<f64>)> = Electrode::SCALP
            .iter()
            .map(|&electrode| table.channel_profile(electrode.index()).map(|p| (electrode, p)))
            .collect::<Option<_>>()?;

        let combined: Vec<(Electrode, &[f64])> =
            profiles.iter().map(|(e, p)| (*e, p.as_slice())).collect();
        let all = self.estimate(&combined);

        let per_band = Band::ALL
            .iter()
            .enumerate()
            .map(|(band_index, &band)| {
                let values: Vec<(Electrode, &[f64])> = profiles
                    .iter()
                    .map(|(e, p)| (*e, std::slice::from_ref(&p[band_index])))
                    .collect();
                (band, self.estimate(&values))
            })
            .collect();

        Some(SpatialMap { all, per_band })
    }
}

fn mean_abs(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v.abs(), count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scalar(values: [f64; 4]) -> Vec<(Electrode, f64)> {
        Electrode::SCALP.iter().copied().zip(values).collect()
    }

    #[test]
    fn test_equal_power_is_centered() {
        let point = SpatialWeightEstimator.estimate_scalar(&scalar([2.0; 4]));
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 0.0);
        assert_eq!(point.magnitude, 16.0);
    }

    #[test]
    fn test_pure_back() {
        let point = SpatialWeightEstimator.estimate_scalar(&scalar([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(point.x, 0.0);
        assert!(point.y > 0.0);
    }

    #[test]
    fn test_left_front() {
        // AF7 only
        let point = SpatialWeightEstimator.estimate_scalar(&scalar([0.0, 3.0, 0.0, 0.0]));
        assert_eq!(point.x, -3.0);
        assert_eq!(point.y, -3.0);
        assert_eq!(point.magnitude, 6.0);
    }

    #[test]
    fn test_negative_power_uses_absolute_value() {
        let point = SpatialWeightEstimator.estimate_scalar(&scalar([0.0, 0.0, -2.0, 0.0]));
        assert_eq!(point.x, 2.0);
        assert_eq!(point.magnitude, 4.0);
    }

    #[test]
    fn test_vector_contribution_is_mean_abs() {
        let tp9 = [1.0, -3.0];
        let point = SpatialWeightEstimator.estimate(&[(Electrode::Tp9, &tp9[..])]);
        assert_eq!(point.x, -2.0);
        assert_eq!(point.y, 2.0);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let tp9 = [1.0, f64::NAN, -3.0];
        let af8 = [f64::INFINITY];
        let point = SpatialWeightEstimator.estimate(&[(Electrode::Tp9, &tp9[..]), (Electrode::Af8, &af8[..])]);
        assert_eq!(point.x, -2.0);
        assert_eq!(point.y, 2.0);
        assert_eq!(point.magnitude, 4.0);

        let point = SpatialWeightEstimator.estimate_scalar(&scalar([f64::NAN, 0.0, 0.0, 2.0]));
        assert_eq!(point.x, 2.0);
        assert_eq!(point.y, 2.0);
        assert!(point.magnitude.is_finite());
    }

    #[test]
    fn test_aux_contributes_nothing() {
        let point = SpatialWeightEstimator.estimate_scalar(&[(Electrode::RightAux, 5.0)]);
        assert_eq!(point.magnitude, 0.0);
    }

    #[test]
    fn test_map_from_table() {
        let mut powers = BTreeMap::new();
        for band in Band::ALL {
            powers.insert(band, vec![1.0, 1.0, 1.0, 1.0]);
        }
        // alpha concentrated at the back
        powers.insert(Band::Alpha, vec![4.0, 0.0, 0.0, 4.0]);
        let table = BandPowerTable::from_map(powers);

        let map = SpatialWeightEstimator.map(&table).unwrap();
        assert_eq!(map.per_band.len(), Band::ALL.len());
        assert_eq!(map.band(Band::Delta).unwrap().y, 0.0);

        let alpha = map.band(Band::Alpha).unwrap();
        assert_eq!(alpha.x, 0.0);
        assert_eq!(alpha.y, 8.0);

        // rear profiles are [1, 1, 4, 1, 1] (mean 1.6), frontal ones [1, 1, 0, 1, 1] (mean 0.8)
        assert!((map.all.y - (2.0 * 1.6 - 2.0 * 0.8)).abs() < 1e-9);
        assert!(map.all.x.abs() < 1e-12);
    }

    #[test]
    fn test_map_requires_all_scalp_channels() {
        let table = BandPowerTable::from_map(BTreeMap::from([(Band::Delta, vec![1.0, 1.0, 1.0, 1.0])]));
        assert!(SpatialWeightEstimator.map(&table).is_none());
    }
}
