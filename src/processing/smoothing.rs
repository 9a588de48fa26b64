// src/processing/smoothing.rs
//! Trailing moving-average smoother for chart series

use crate::error::{SignalErrorBuilder, SignalResult};
use crate::processing::stats::finite_mean;

/// Sliding-window mean over a buffered series.
///
/// The window trails its output position, so smoothed output lags the raw
/// input by `(window - 1) / 2` samples. The lag is not compensated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageSmoother {
    window: usize,
}

impl MovingAverageSmoother {
    pub fn new(window: usize) -> SignalResult<Self> {
        if window == 0 {
            return Err(SignalErrorBuilder::new("moving_average").configuration("window must be greater than 0"));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Smooth `series`.
    ///
    /// A series shorter than the window is returned unchanged. Otherwise the
    /// output has `len - window + 1` values; each is the mean of the finite
    /// values in its window, or `NaN` when the window has none.
    pub fn smooth(&self, series: &[f64]) -> Vec<f64> {
        if series.len() < self.window {
            return series.to_vec();
        }

        series.windows(self.window).map(finite_mean).collect()
    }
}
