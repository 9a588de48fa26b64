// src/config/processing_config.rs
//! Derived-metric configuration structures

use crate::config::constants::{heart_rate, signal};
use serde::{Deserialize, Serialize};

/// Moving-average smoothing configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmoothingConfig {
    #[serde(default = "defaults::smoothing_window")]
    pub window: usize,
}

/// Where band powers come from on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPowerSource {
    /// Use the upstream `eeg_bands` table when present, derive otherwise
    PreferUpstream,
    /// Always derive from the EEG spectrum
    Derive,
}

/// How bucket magnitudes inside a band collapse into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandAggregation {
    /// Largest magnitude in the band (what the streaming server sends)
    Max,
    /// Mean magnitude in the band
    Mean,
    /// Summed magnitude in the band
    Sum,
}

/// Band power configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BandPowerConfig {
    #[serde(default = "defaults::band_source")]
    pub source: BandPowerSource,

    #[serde(default = "defaults::band_aggregation")]
    pub aggregation: BandAggregation,
}

/// Spectrum range used for the heart rate centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeartRateWindow {
    /// Buckets with `low_hz <= f <= high_hz`
    Frequency { low_hz: f64, high_hz: f64 },
    /// Buckets `start..=end` by index
    BucketIndex { start: usize, end: usize },
}

/// Heart rate estimation configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HeartRateConfig {
    #[serde(default = "defaults::heart_rate_window")]
    pub window: HeartRateWindow,

    /// PPG channel whose spectrum feeds the estimate
    #[serde(default)]
    pub ppg_channel: usize,
}

/// Local spectrum computation fallback
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SpectrumConfig {
    /// Compute spectra from the buffers when a message carries none
    #[serde(default = "defaults::compute_locally")]
    pub compute_locally: bool,

    #[serde(default = "defaults::eeg_sample_rate_hz")]
    pub eeg_sample_rate_hz: f64,

    #[serde(default = "defaults::ppg_sample_rate_hz")]
    pub ppg_sample_rate_hz: f64,
}

mod defaults {
    use super::*;

    pub fn smoothing_window() -> usize { signal::DEFAULT_SMOOTHING_WINDOW }
    pub fn band_source() -> BandPowerSource { BandPowerSource::PreferUpstream }
    pub fn band_aggregation() -> BandAggregation { BandAggregation::Max }
    pub fn heart_rate_window() -> HeartRateWindow {
        HeartRateWindow::Frequency {
            low_hz: heart_rate::DEFAULT_LOW_HZ,
            high_hz: heart_rate::DEFAULT_HIGH_HZ,
        }
    }
    pub fn compute_locally() -> bool { true }
    pub fn eeg_sample_rate_hz() -> f64 { signal::DEFAULT_EEG_SAMPLE_RATE_HZ }
    pub fn ppg_sample_rate_hz() -> f64 { signal::DEFAULT_PPG_SAMPLE_RATE_HZ }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: defaults::smoothing_window() }
    }
}

impl Default for BandPowerConfig {
    fn default() -> Self {
        Self {
            source: defaults::band_source(),
            aggregation: defaults::band_aggregation(),
        }
    }
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            window: defaults::heart_rate_window(),
            ppg_channel: 0,
        }
    }
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            compute_locally: defaults::compute_locally(),
            eeg_sample_rate_hz: defaults::eeg_sample_rate_hz(),
            ppg_sample_rate_hz: defaults::ppg_sample_rate_hz(),
        }
    }
}

impl HeartRateWindow {
    /// Validate the range bounds
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            HeartRateWindow::Frequency { low_hz, high_hz } => {
                if !(low_hz.is_finite() && high_hz.is_finite()) {
                    return Err("Heart rate frequency bounds must be finite".to_string());
                }
                if low_hz < 0.0 || high_hz <= low_hz {
                    return Err(format!(
                        "Heart rate range must satisfy 0 <= low < high (got {}..{} Hz)",
                        low_hz, high_hz
                    ));
                }
            }
            HeartRateWindow::BucketIndex { start, end } => {
                if end < start {
                    return Err(format!(
                        "Heart rate bucket range end ({}) precedes start ({})",
                        end, start
                    ));
                }
            }
        }
        Ok(())
    }
}
