//! Biosignal-Core: signal buffering and derived metrics for a streaming EEG headband
//!
//! This library keeps the recent history of a headband's sensor streams and
//! turns it into the numbers a live display needs. It features:
//!
//! - Bounded per-channel sample buffers for EEG, PPG and joystick streams
//! - Moving-average smoothing of buffered series
//! - EEG band power, scalp spatial weighting and power balances
//! - Heart rate from the PPG spectrum
//! - Harmonic-series variance of the EEG spectrum
//! - A versioned JSON message schema and TOML configuration
//!
//! # Quick Start
//!
//! ```rust
//! use biosignal_core::{CoreConfig, SampleFrame, SignalSession, StreamMessage, TickOutcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = SignalSession::new(CoreConfig::default())?;
//!     let sender = session.sender();
//!
//!     // Transport side
//!     sender.send(StreamMessage::samples(SampleFrame {
//!         eeg: vec![12.0, -3.5, 4.0, 8.25],
//!         ppg: vec![1.0, 1.1, 0.9],
//!         joystick: Some([0.0, 0.5]),
//!     }))?;
//!
//!     // Render loop side, once per frame
//!     if let TickOutcome::Ready(metrics) = session.tick() {
//!         println!("smoothed: {:?}", metrics.smoothed);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod processing;
pub mod protocol;
pub mod session;
pub mod types;

// Re-export commonly used types for convenience
pub use acquisition::{BufferMetrics, NanPolicy, SampleBuffer, StreamBuffers};
pub use config::{ConfigError, ConfigLoader, CoreConfig};
pub use error::{SignalError, SignalResult};
pub use processing::{
    Band, BandPowerExtractor, BandPowerTable, HarmonicVarianceAnalyzer, HeartRateEstimator,
    MovingAverageSmoother, SpatialWeight, SpatialWeightEstimator, SpectrumAnalyzer, SpectrumSnapshot,
};
pub use protocol::{Payload, SampleFrame, StreamMessage, WindowFrame};
pub use session::{DerivedMetrics, SignalSession, TickOutcome, TickSnapshot};
pub use types::{Channel, Electrode, JoystickAxis};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Signal buffering and derived metrics for a streaming EEG headband".to_string(),
        features: vec![
            "Bounded per-channel sample buffers".to_string(),
            "Moving-average smoothing".to_string(),
            "Band power and spatial weighting".to_string(),
            "PPG heart rate estimation".to_string(),
            "Harmonic variance analysis".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
