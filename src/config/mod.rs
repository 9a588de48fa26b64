// src/config/mod.rs
//! Configuration management

pub mod constants;
pub mod loader;
pub mod processing_config;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};
pub use processing_config::*;

use crate::acquisition::NanPolicy;
use crate::types::PPG_CHANNEL_COUNT;
use serde::{Deserialize, Serialize};

/// Complete core configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CoreConfig {
    #[serde(default)]
    pub buffers: BufferSettings,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub bands: BandPowerConfig,
    #[serde(default)]
    pub heart_rate: HeartRateConfig,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

/// Per-stream sample buffer settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BufferSettings {
    #[serde(default = "defaults::eeg_capacity")]
    pub eeg_capacity: usize,

    #[serde(default = "defaults::ppg_capacity")]
    pub ppg_capacity: usize,

    #[serde(default = "defaults::joystick_capacity")]
    pub joystick_capacity: usize,

    #[serde(default = "defaults::nan_policy")]
    pub nan_policy: NanPolicy,

    /// Track the auxiliary EEG input as a fifth channel
    #[serde(default = "defaults::include_aux")]
    pub include_aux: bool,
}

/// Default value providers using constants
mod defaults {
    use crate::acquisition::NanPolicy;
    use crate::config::constants::*;

    pub fn eeg_capacity() -> usize { buffers::DEFAULT_EEG_CAPACITY }
    pub fn ppg_capacity() -> usize { buffers::DEFAULT_PPG_CAPACITY }
    pub fn joystick_capacity() -> usize { buffers::DEFAULT_JOYSTICK_CAPACITY }
    pub fn nan_policy() -> NanPolicy { NanPolicy::Lenient }
    pub fn include_aux() -> bool { true }
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            eeg_capacity: defaults::eeg_capacity(),
            ppg_capacity: defaults::ppg_capacity(),
            joystick_capacity: defaults::joystick_capacity(),
            nan_policy: defaults::nan_policy(),
            include_aux: defaults::include_aux(),
        }
    }
}

impl CoreConfig {
    /// Validate configuration consistency, collecting every problem found
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, capacity) in [
            ("eeg_capacity", self.buffers.eeg_capacity),
            ("ppg_capacity", self.buffers.ppg_capacity),
            ("joystick_capacity", self.buffers.joystick_capacity),
        ] {
            if capacity == 0 {
                errors.push(format!("Buffer {} must be greater than 0", name));
            } else if capacity > buffers::MAX_CAPACITY {
                errors.push(format!(
                    "Buffer {} ({}) exceeds maximum of {}",
                    name, capacity, buffers::MAX_CAPACITY
                ));
            }
        }

        if self.smoothing.window == 0 {
            errors.push("Smoothing window must be greater than 0".to_string());
        }

        if let Err(reason) = self.heart_rate.window.validate() {
            errors.push(reason);
        }
        if self.heart_rate.ppg_channel >= PPG_CHANNEL_COUNT {
            errors.push(format!(
                "Heart rate PPG channel {} out of range (0..{})",
                self.heart_rate.ppg_channel, PPG_CHANNEL_COUNT
            ));
        }

        for (name, rate) in [
            ("eeg_sample_rate_hz", self.spectrum.eeg_sample_rate_hz),
            ("ppg_sample_rate_hz", self.spectrum.ppg_sample_rate_hz),
        ] {
            if !(rate.is_finite() && rate > 0.0) {
                errors.push(format!("Spectrum {} must be positive (got {})", name, rate));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            eeg_capacity: self.buffers.eeg_capacity,
            ppg_capacity: self.buffers.ppg_capacity,
            nan_policy: self.buffers.nan_policy,
            smoothing_window: self.smoothing.window,
            heart_rate_window: self.heart_rate.window,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub eeg_capacity: usize,
    pub ppg_capacity: usize,
    pub nan_policy: NanPolicy,
    pub smoothing_window: usize,
    pub heart_rate_window: HeartRateWindow,
}
