// src/processing/heart_rate.rs
//! Heart rate from the frequency-weighted centroid of a PPG spectrum

use crate::config::constants::heart_rate::SECONDS_PER_MINUTE;
use crate::config::HeartRateWindow;
use crate::processing::spectrum::SpectrumSnapshot;

/// Estimates beats per minute from a PPG magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateEstimator {
    window: HeartRateWindow,
}

impl HeartRateEstimator {
    pub fn new(window: HeartRateWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> HeartRateWindow {
        self.window
    }

    /// Centroid of `magnitudes` over `buckets` restricted to
    /// `low_hz <= f <= high_hz`, in beats per minute.
    ///
    /// `NaN` when the range is empty or holds no energy; callers treat that as
    /// "no pulse this tick".
    pub fn estimate(buckets: &[f64], magnitudes: &[f64], low_hz: f64, high_hz: f64) -> f64 {
        let Some(start) = buckets.iter().position(|&f| f >= low_hz) else {
            return f64::NAN;
        };
        let Some(end) = buckets.iter().rposition(|&f| f <= high_hz) else {
            return f64::NAN;
        };
        Self::centroid_bpm(buckets, magnitudes, start, end)
    }

    /// Estimate from one channel of `spectrum` using the configured window
    pub fn estimate_channel(&self, spectrum: &SpectrumSnapshot, channel: usize) -> f64 {
        let Some(magnitudes) = spectrum.channel_vec(channel) else {
            return f64::NAN;
        };
        let buckets = spectrum.frequency_buckets();

        match self.window {
            HeartRateWindow::Frequency { low_hz, high_hz } => {
                Self::estimate(buckets, &magnitudes, low_hz, high_hz)
            }
            HeartRateWindow::BucketIndex { start, end } => {
                Self::centroid_bpm(buckets, &magnitudes, start, end)
            }
        }
    }

    fn centroid_bpm(buckets: &[f64], magnitudes: &[f64], start: usize, end: usize) -> f64 {
        let last = end.min(buckets.len().min(magnitudes.len()).saturating_sub(1));
        if buckets.is_empty() || magnitudes.is_empty() || start > last {
            return f64::NAN;
        }

        let (weighted, total) = buckets[start..=last]
            .iter()
            .zip(&magnitudes[start..=last])
            .filter(|(f, m)| f.is_finite() && m.is_finite())
            .fold((0.0, 0.0), |(weighted, total), (&f, &m)| (weighted + f * m, total + m));

        // 0/0 yields NaN
        (weighted / total) * SECONDS_PER_MINUTE
    }
}

impl Default for HeartRateEstimator {
    fn default() -> Self {
        Self::new(crate::config::HeartRateConfig::default().window)
    }
}
