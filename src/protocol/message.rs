// src/protocol/message.rs
//! Versioned message schema shared with the streaming server
//!
//! Every frame is a JSON envelope `{"version": 1, "type": ..., ...}`. Two
//! payload shapes exist: `samples` carries one reading per channel, `window`
//! carries whole buffers plus the server-side spectra. Every field of a
//! window is optional; an absent field only disables the metrics that need it.

use crate::config::constants::protocol::MESSAGE_VERSION;
use crate::error::{SignalError, SignalResult};
use crate::processing::bands::Band;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded message envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamMessage {
    pub version: u32,
    #[serde(flatten)]
    pub payload: Payload,
}

/// Message payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// One sample per channel
    Samples(SampleFrame),
    /// Full windows and spectra
    Window(WindowFrame),
}

/// One reading per channel, in stream column order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleFrame {
    #[serde(default)]
    pub eeg: Vec<f64>,
    #[serde(default)]
    pub ppg: Vec<f64>,
    #[serde(default)]
    pub joystick: Option<[f64; 2]>,
}

/// Spectrum as sent on the wire: `fft[bucket][channel]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumPayload {
    pub frequency_buckets: Vec<f64>,
    pub fft: Vec<Vec<f64>>,
}

/// Whole buffers and derived spectra computed by the server
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowFrame {
    /// Rows are time, columns are EEG channels
    #[serde(default)]
    pub eeg_buffer: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub ppg_buffer: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub joystick_buffer: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub eeg_spectrum: Option<SpectrumPayload>,
    #[serde(default)]
    pub ppg_spectrum: Option<SpectrumPayload>,
    /// Band name to per-channel power
    #[serde(default)]
    pub eeg_bands: Option<BTreeMap<Band, Vec<f64>>>,
    /// Informational only
    #[serde(default)]
    pub sample_rate: Option<f64>,
}

impl StreamMessage {
    /// Wrap a payload in a current-version envelope
    pub fn new(payload: Payload) -> Self {
        Self {
            version: MESSAGE_VERSION,
            payload,
        }
    }

    /// Single-sample message
    pub fn samples(frame: SampleFrame) -> Self {
        Self::new(Payload::Samples(frame))
    }

    /// Window message
    pub fn window(frame: WindowFrame) -> Self {
        Self::new(Payload::Window(frame))
    }

    /// Decode and version-check one frame
    pub fn from_json(text: &str) -> SignalResult<Self> {
        let message: StreamMessage = serde_json::from_str(text)?;
        if message.version != MESSAGE_VERSION {
            return Err(SignalError::UnsupportedVersion {
                found: message.version,
                supported: MESSAGE_VERSION,
            });
        }
        Ok(message)
    }

    /// Encode as JSON
    pub fn to_json(&self) -> SignalResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
