// src/processing/spectrum.rs
//! Frequency-domain snapshots and the spectrum analyzer that produces them

use crate::error::{SignalErrorBuilder, SignalResult};
use crate::processing::stats::finite_mean;
use crate::protocol::SpectrumPayload;
use ndarray::{Array2, ArrayView1};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;
use std::ops::RangeInclusive;

/// Magnitude spectrum for several channels sharing one bucket table.
///
/// `magnitudes[[bucket, channel]]` is the magnitude of `channel` at
/// `frequency_buckets[bucket]` Hz. Buckets are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSnapshot {
    frequency_buckets: Vec<f64>,
    magnitudes: Array2<f64>,
}

impl SpectrumSnapshot {
    /// Build from a bucket table and `rows[bucket][channel]`
    pub fn new(frequency_buckets: Vec<f64>, rows: &[Vec<f64>]) -> SignalResult<Self> {
        let errors = SignalErrorBuilder::new;

        if rows.len() != frequency_buckets.len() {
            return Err(errors("spectrum").invalid_data(&format!(
                "{} magnitude rows for {} frequency buckets",
                rows.len(),
                frequency_buckets.len()
            )));
        }
        if frequency_buckets.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(errors("spectrum").invalid_data("frequency buckets must be strictly increasing"));
        }

        let channels = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != channels) {
            return Err(errors("spectrum").invalid_data("magnitude rows have differing channel counts"));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let magnitudes = Array2::from_shape_vec((rows.len(), channels), flat)
            .map_err(|e| errors("spectrum").invalid_data(&e.to_string()))?;

        Ok(Self {
            frequency_buckets,
            magnitudes,
        })
    }

    /// Single-channel spectrum
    pub fn single(frequency_buckets: Vec<f64>, magnitudes: &[f64]) -> SignalResult<Self> {
        let rows: Vec<Vec<f64>> = magnitudes.iter().map(|&m| vec![m]).collect();
        Self::new(frequency_buckets, &rows)
    }

    /// Validate a wire payload
    pub fn from_payload(payload: &SpectrumPayload) -> SignalResult<Self> {
        Self::new(payload.frequency_buckets.clone(), &payload.fft)
    }

    pub fn frequency_buckets(&self) -> &[f64] {
        &self.frequency_buckets
    }

    pub fn bucket_count(&self) -> usize {
        self.magnitudes.nrows()
    }

    pub fn channel_count(&self) -> usize {
        self.magnitudes.ncols()
    }

    /// Magnitude column of one channel, if present
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.channel_count()).then(|| self.magnitudes.column(index))
    }

    /// Owned magnitude column of one channel
    pub fn channel_vec(&self, index: usize) -> Option<Vec<f64>> {
        self.channel(index).map(|column| column.to_vec())
    }

    /// Buckets with `low <= f <= high`, found as first index `>= low` and last index `<= high`
    pub fn inclusive_range(&self, low: f64, high: f64) -> Option<RangeInclusive<usize>> {
        let start = self.frequency_buckets.iter().position(|&f| f >= low)?;
        let end = self.frequency_buckets.iter().rposition(|&f| f <= high)?;
        (start <= end).then_some(start..=end)
    }

    /// Buckets with `low <= f < high`
    pub fn half_open_range(&self, low: f64, high: f64) -> std::ops::Range<usize> {
        let start = self.frequency_buckets.partition_point(|&f| f < low);
        let end = self.frequency_buckets.partition_point(|&f| f < high);
        start..end.max(start)
    }
}

/// Computes magnitude spectra from time-domain windows the way the streaming
/// server does: remove the per-channel mean, apply a Hamming window, zero-pad
/// to the next power of two, scale by the window length and keep `2|Y|` for
/// the lower half of the bins.
///
/// The mean is taken over finite samples only and non-finite samples are
/// replaced by it, so one gap does not poison the whole channel.
pub struct SpectrumAnalyzer {
    sample_rate: f64,
    planner: FftPlanner<f64>,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: f64) -> SignalResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SignalErrorBuilder::new("spectrum_analyzer").configuration("sample rate must be positive"));
        }
        Ok(Self {
            sample_rate,
            planner: FftPlanner::new(),
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Spectrum of `rows[time][channel]`; `None` for windows too short to
    /// yield a bucket table.
    pub fn analyze(&mut self, rows: &[Vec<f64>]) -> Option<SpectrumSnapshot> {
        let window_len = rows.len();
        let channels = rows.first()?.len();
        let nfft = window_len.next_power_of_two();
        let half = nfft / 2;
        if half < 2 || channels == 0 {
            return None;
        }

        let hamming = hamming_window(window_len);
        let fft = self.planner.plan_fft_forward(nfft);
        let mut magnitudes = Array2::<f64>::zeros((half, channels));
        let mut buffer = vec![Complex::new(0.0, 0.0); nfft];

        for channel in 0..channels {
            let column: Vec<f64> = rows.iter().map(|row| row.get(channel).copied().unwrap_or(0.0)).collect();
            let mean = finite_mean(&column);

            // non-finite samples enter the FFT as the channel mean, i.e. zero after demeaning
            buffer.iter_mut().for_each(|c| *c = Complex::new(0.0, 0.0));
            for (slot, (&x, &w)) in buffer.iter_mut().zip(column.iter().zip(hamming.iter())) {
                let centered = if x.is_finite() && mean.is_finite() { x - mean } else { 0.0 };
                *slot = Complex::new(centered * w, 0.0);
            }

            fft.process(&mut buffer);

            for (bin, value) in buffer.iter().take(half).enumerate() {
                magnitudes[[bin, channel]] = 2.0 * value.norm() / window_len as f64;
            }
        }

        let nyquist = self.sample_rate / 2.0;
        let frequency_buckets = (0..half)
            .map(|i| nyquist * i as f64 / (half - 1) as f64)
            .collect();

        Some(SpectrumSnapshot {
            frequency_buckets,
            magnitudes,
        })
    }
}

fn hamming_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (size - 1) as f64).cos())
        .collect()
}
