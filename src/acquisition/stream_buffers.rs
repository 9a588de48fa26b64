// src/acquisition/stream_buffers.rs
//! Per-channel sample buffers for every sensor stream

use crate::acquisition::sample_buffer::SampleBuffer;
use crate::config::BufferSettings;
use crate::error::SignalResult;
use crate::protocol::{SampleFrame, WindowFrame};
use crate::types::{Channel, Electrode, JoystickAxis, PPG_CHANNEL_COUNT};
use tracing::trace;

/// Ingestion counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferMetrics {
    /// Values appended across all channels
    pub samples_received: u64,
    /// Values rejected by strict NaN policy
    pub samples_dropped: u64,
    /// Values addressed to channels that are not tracked
    pub samples_ignored: u64,
}

/// One [`SampleBuffer`] per tracked channel
#[derive(Debug, Clone)]
pub struct StreamBuffers {
    eeg: Vec<SampleBuffer>,
    ppg: Vec<SampleBuffer>,
    joystick: Vec<SampleBuffer>,
    metrics: BufferMetrics,
}

impl StreamBuffers {
    /// Create empty buffers sized from configuration
    pub fn new(settings: &BufferSettings) -> SignalResult<Self> {
        let eeg_channels = if settings.include_aux {
            Electrode::ALL.len()
        } else {
            Electrode::SCALP.len()
        };

        let make = |count: usize, capacity: usize| -> SignalResult<Vec<SampleBuffer>> {
            (0..count)
                .map(|_| SampleBuffer::new(capacity, settings.nan_policy))
                .collect()
        };

        Ok(Self {
            eeg: make(eeg_channels, settings.eeg_capacity)?,
            ppg: make(PPG_CHANNEL_COUNT, settings.ppg_capacity)?,
            joystick: make(JoystickAxis::ALL.len(), settings.joystick_capacity)?,
            metrics: BufferMetrics::default(),
        })
    }

    /// Append one value to a channel.
    ///
    /// Returns `false` if the channel is not tracked or the value was dropped.
    pub fn push(&mut self, channel: Channel, value: f64) -> bool {
        let Some(buffer) = self.buffer_mut(channel) else {
            self.metrics.samples_ignored += 1;
            trace!(%channel, "ignoring sample for untracked channel");
            return false;
        };

        let stored = buffer.push(value);
        if stored {
            self.metrics.samples_received += 1;
        } else {
            self.metrics.samples_dropped += 1;
        }
        stored
    }

    /// Buffer for a channel, if tracked
    pub fn buffer(&self, channel: Channel) -> Option<&SampleBuffer> {
        match channel {
            Channel::Eeg(electrode) => self.eeg.get(electrode.index()),
            Channel::Ppg(index) => self.ppg.get(index),
            Channel::Joystick(axis) => self.joystick.get(axis.index()),
        }
    }

    fn buffer_mut(&mut self, channel: Channel) -> Option<&mut SampleBuffer> {
        match channel {
            Channel::Eeg(electrode) => self.eeg.get_mut(electrode.index()),
            Channel::Ppg(index) => self.ppg.get_mut(index),
            Channel::Joystick(axis) => self.joystick.get_mut(axis.index()),
        }
    }

    /// Every tracked channel in stream order
    pub fn channels(&self) -> Vec<Channel> {
        let eeg = Electrode::ALL.iter().take(self.eeg.len()).map(|&e| Channel::Eeg(e));
        let ppg = (0..self.ppg.len()).map(Channel::Ppg);
        let joystick = JoystickAxis::ALL.iter().map(|&a| Channel::Joystick(a));
        eeg.chain(ppg).chain(joystick).collect()
    }

    /// Append a single-reading frame
    pub fn ingest_samples(&mut self, frame: &SampleFrame) {
        for (index, &value) in frame.eeg.iter().enumerate() {
            match Electrode::from_index(index) {
                Some(electrode) => {
                    self.push(Channel::Eeg(electrode), value);
                }
                None => self.metrics.samples_ignored += 1,
            }
        }
        for (index, &value) in frame.ppg.iter().enumerate() {
            self.push(Channel::Ppg(index), value);
        }
        if let Some(pair) = frame.joystick {
            self.push_joystick(pair);
        }
    }

    /// Append every row of the buffers a window frame carries.
    ///
    /// Windows longer than the capacity leave only their most recent rows.
    pub fn ingest_window(&mut self, frame: &WindowFrame) {
        if let Some(rows) = &frame.eeg_buffer {
            for row in rows {
                for (index, &value) in row.iter().enumerate() {
                    match Electrode::from_index(index) {
                        Some(electrode) => {
                            self.push(Channel::Eeg(electrode), value);
                        }
                        None => self.metrics.samples_ignored += 1,
                    }
                }
            }
        }
        if let Some(rows) = &frame.ppg_buffer {
            for row in rows {
                for (index, &value) in row.iter().enumerate() {
                    self.push(Channel::Ppg(index), value);
                }
            }
        }
        if let Some(pairs) = &frame.joystick_buffer {
            for &pair in pairs {
                self.push_joystick(pair);
            }
        }
    }

    fn push_joystick(&mut self, pair: [f64; 2]) {
        for axis in JoystickAxis::ALL {
            self.push(Channel::Joystick(axis), pair[axis.index()]);
        }
    }

    /// Copy every tracked channel's contents
    pub fn snapshot(&self) -> Vec<(Channel, Vec<f64>)> {
        self.channels()
            .into_iter()
            .filter_map(|channel| self.buffer(channel).map(|b| (channel, b.snapshot())))
            .collect()
    }

    /// EEG contents as `rows[time][channel]`, truncated to the shortest channel.
    ///
    /// Empty trailing channels (an unfed auxiliary input) are left out, so
    /// column indices still match [`Electrode::index`].
    pub fn eeg_rows(&self) -> Vec<Vec<f64>> {
        rows_of(&self.eeg)
    }

    /// PPG contents as `rows[time][channel]`, truncated to the shortest channel
    /// with empty trailing channels left out
    pub fn ppg_rows(&self) -> Vec<Vec<f64>> {
        rows_of(&self.ppg)
    }

    pub fn metrics(&self) -> &BufferMetrics {
        &self.metrics
    }

    /// True once any channel holds data
    pub fn has_data(&self) -> bool {
        self.eeg
            .iter()
            .chain(self.ppg.iter())
            .chain(self.joystick.iter())
            .any(|b| !b.is_empty())
    }

    pub fn clear(&mut self) {
        for buffer in self.eeg.iter_mut().chain(self.ppg.iter_mut()).chain(self.joystick.iter_mut()) {
            buffer.clear();
        }
        self.metrics = BufferMetrics::default();
    }
}

fn rows_of(buffers: &[SampleBuffer]) -> Vec<Vec<f64>> {
    // trailing channels that never received data do not hold the others back
    let active = buffers.iter().rposition(|b| !b.is_empty()).map_or(0, |last| last + 1);
    let buffers = &buffers[..active];

    let len = buffers.iter().map(SampleBuffer::len).min().unwrap_or(0);
    let columns: Vec<Vec<f64>> = buffers
        .iter()
        .map(|b| {
            let skip = b.len() - len;
            b.iter().skip(skip).copied().collect()
        })
        .collect();

    (0..len)
        .map(|t| columns.iter().map(|column| column[t]).collect())
        .collect()
}
