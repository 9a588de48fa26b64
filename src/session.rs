// src/session.rs
//! Session state and the per-frame tick
//!
//! [`SignalSession`] is the single owner of everything the transport has
//! delivered so far. The transport pushes decoded messages into the session's
//! inbox from any thread; the render loop calls [`SignalSession::tick`] once
//! per frame. Each tick drains the inbox, freezes one [`TickSnapshot`] and
//! derives every metric from it, so no metric sees a half-applied message.

use crate::acquisition::{BufferMetrics, StreamBuffers};
use crate::config::constants::protocol::MESSAGE_VERSION;
use crate::config::CoreConfig;
use crate::error::{SignalError, SignalErrorBuilder, SignalResult};
use crate::processing::{
    BandPowerExtractor, BandPowerTable, HarmonicProfile, HarmonicVarianceAnalyzer, HeartRateEstimator,
    MovingAverageSmoother, PowerBalances, SpatialMap, SpatialWeightEstimator, SpectrumAnalyzer,
    SpectrumSnapshot,
};
use crate::protocol::{Payload, SpectrumPayload, StreamMessage, WindowFrame};
use crate::types::{Channel, Electrode};
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing has arrived yet; try again next frame
    Waiting,
    /// Metrics derived from this tick's snapshot
    Ready(DerivedMetrics),
}

impl TickOutcome {
    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        match self {
            TickOutcome::Waiting => None,
            TickOutcome::Ready(metrics) => Some(metrics),
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, TickOutcome::Waiting)
    }
}

/// Immutable view of the session taken at the start of a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickSnapshot {
    /// Buffered samples of every tracked channel
    pub series: Vec<(Channel, Vec<f64>)>,
    pub eeg_spectrum: Option<SpectrumSnapshot>,
    pub ppg_spectrum: Option<SpectrumSnapshot>,
    /// Band table as sent by the server, if any
    pub upstream_bands: Option<BandPowerTable>,
    /// Informational sample rate from the last window
    pub sample_rate: Option<f64>,
}

/// Everything derived in one tick. Each field is independent; a missing input
/// only leaves its own metric empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedMetrics {
    /// Moving average of every channel that holds data
    pub smoothed: Option<Vec<(Channel, Vec<f64>)>>,
    pub bands: Option<BandPowerTable>,
    pub spatial: Option<SpatialMap>,
    pub heart_rate_bpm: Option<f64>,
    pub balances: Option<PowerBalances>,
    /// Spectral and harmonic variance per scalp electrode
    pub harmonics: Option<Vec<(Electrode, HarmonicProfile)>>,
}

impl DerivedMetrics {
    /// Derive every metric from one snapshot
    pub fn compute(snapshot: &TickSnapshot, config: &CoreConfig) -> Self {
        let smoothed = smooth_series(&snapshot.series, config.smoothing.window);

        let extractor = BandPowerExtractor::new(config.bands.aggregation);
        let bands = extractor.resolve(
            config.bands.source,
            snapshot.upstream_bands.as_ref(),
            snapshot.eeg_spectrum.as_ref(),
        );
        if bands.is_none() {
            debug!("no EEG spectrum or band table, skipping band metrics");
        }

        let spatial = bands.as_ref().and_then(|table| SpatialWeightEstimator.map(table));
        if bands.is_some() && spatial.is_none() {
            debug!("band table lacks scalp channels, skipping spatial map");
        }

        let heart_rate_bpm = match &snapshot.ppg_spectrum {
            Some(spectrum) => {
                let estimator = HeartRateEstimator::new(config.heart_rate.window);
                let bpm = estimator.estimate_channel(spectrum, config.heart_rate.ppg_channel);
                if !bpm.is_finite() {
                    debug!("no pulse energy in the heart rate window");
                }
                bpm.is_finite().then_some(bpm)
            }
            None => {
                debug!("no PPG spectrum, skipping heart rate");
                None
            }
        };

        let balances = bands
            .as_ref()
            .map(|table| PowerBalances::compute(table, snapshot.eeg_spectrum.as_ref()));

        let harmonics = snapshot.eeg_spectrum.as_ref().map(|spectrum| {
            Electrode::SCALP
                .iter()
                .filter_map(|&electrode| {
                    let magnitudes = spectrum.channel_vec(electrode.index())?;
                    Some((electrode, HarmonicVarianceAnalyzer.profile(&magnitudes)))
                })
                .collect()
        });

        Self {
            smoothed,
            bands,
            spatial,
            heart_rate_bpm,
            balances,
            harmonics,
        }
    }
}

fn smooth_series(series: &[(Channel, Vec<f64>)], window: usize) -> Option<Vec<(Channel, Vec<f64>)>> {
    let smoother = match MovingAverageSmoother::new(window) {
        Ok(smoother) => smoother,
        Err(e) => {
            debug!(error = %e, "skipping smoothing");
            return None;
        }
    };

    let smoothed: Vec<(Channel, Vec<f64>)> = series
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(channel, values)| (*channel, smoother.smooth(values)))
        .collect();

    if smoothed.is_empty() {
        debug!("no buffered samples, skipping smoothing");
        return None;
    }
    Some(smoothed)
}

/// Owner of the buffered streams and the latest spectra
pub struct SignalSession {
    config: CoreConfig,
    buffers: StreamBuffers,
    eeg_spectrum: Option<SpectrumSnapshot>,
    ppg_spectrum: Option<SpectrumSnapshot>,
    upstream_bands: Option<BandPowerTable>,
    sample_rate: Option<f64>,
    eeg_analyzer: SpectrumAnalyzer,
    ppg_analyzer: SpectrumAnalyzer,
    inbox: Receiver<StreamMessage>,
    sender: Sender<StreamMessage>,
    received: bool,
}

impl SignalSession {
    /// Create a session from a validated configuration
    pub fn new(config: CoreConfig) -> SignalResult<Self> {
        if let Err(problems) = config.validate_consistency() {
            return Err(SignalErrorBuilder::new("session").configuration(&problems.join("; ")));
        }

        let buffers = StreamBuffers::new(&config.buffers)?;
        let eeg_analyzer = SpectrumAnalyzer::new(config.spectrum.eeg_sample_rate_hz)?;
        let ppg_analyzer = SpectrumAnalyzer::new(config.spectrum.ppg_sample_rate_hz)?;
        let (sender, inbox) = channel::unbounded();

        debug!(summary = ?config.get_summary(), "signal session created");

        Ok(Self {
            config,
            buffers,
            eeg_spectrum: None,
            ppg_spectrum: None,
            upstream_bands: None,
            sample_rate: None,
            eeg_analyzer,
            ppg_analyzer,
            inbox,
            sender,
            received: false,
        })
    }

    /// Handle for the transport; messages sent through it are applied on the next tick
    pub fn sender(&self) -> Sender<StreamMessage> {
        self.sender.clone()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn buffers(&self) -> &StreamBuffers {
        &self.buffers
    }

    pub fn buffer_metrics(&self) -> &BufferMetrics {
        self.buffers.metrics()
    }

    /// True once any message has been applied
    pub fn has_received(&self) -> bool {
        self.received
    }

    /// Apply one message now.
    ///
    /// A malformed spectrum is discarded with a warning; the rest of the
    /// message still applies.
    pub fn ingest(&mut self, message: StreamMessage) -> SignalResult<()> {
        if message.version != MESSAGE_VERSION {
            return Err(SignalError::UnsupportedVersion {
                found: message.version,
                supported: MESSAGE_VERSION,
            });
        }

        match message.payload {
            Payload::Samples(frame) => self.buffers.ingest_samples(&frame),
            Payload::Window(frame) => self.apply_window(frame),
        }
        self.received = true;
        Ok(())
    }

    /// Decode and apply one JSON frame
    pub fn ingest_json(&mut self, text: &str) -> SignalResult<()> {
        self.ingest(StreamMessage::from_json(text)?)
    }

    fn apply_window(&mut self, frame: WindowFrame) {
        self.buffers.ingest_window(&frame);

        if let Some(payload) = &frame.eeg_spectrum {
            self.eeg_spectrum = decode_spectrum("eeg", payload);
        }
        if let Some(payload) = &frame.ppg_spectrum {
            self.ppg_spectrum = decode_spectrum("ppg", payload);
        }
        if let Some(bands) = frame.eeg_bands {
            self.upstream_bands = Some(BandPowerTable::from_map(bands));
        }
        if frame.sample_rate.is_some() {
            self.sample_rate = frame.sample_rate;
        }
    }

    /// Apply every message waiting in the inbox; returns how many were applied
    pub fn drain_inbox(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.inbox.try_recv() {
                Ok(message) => match self.ingest(message) {
                    Ok(()) => applied += 1,
                    Err(e) => warn!(error = %e, "discarding message"),
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        if applied > 0 {
            trace!(applied, "drained inbox");
        }
        applied
    }

    /// Freeze the current state, or `None` before the first message.
    ///
    /// Without an upstream spectrum, one is computed from the buffers when
    /// `spectrum.compute_locally` is set.
    pub fn snapshot(&mut self) -> Option<TickSnapshot> {
        if !self.received {
            return None;
        }

        let compute_locally = self.config.spectrum.compute_locally;
        let eeg_spectrum = match &self.eeg_spectrum {
            Some(spectrum) => Some(spectrum.clone()),
            None if compute_locally => self.eeg_analyzer.analyze(&self.buffers.eeg_rows()),
            None => None,
        };
        let ppg_spectrum = match &self.ppg_spectrum {
            Some(spectrum) => Some(spectrum.clone()),
            None if compute_locally => self.ppg_analyzer.analyze(&self.buffers.ppg_rows()),
            None => None,
        };

        Some(TickSnapshot {
            series: self.buffers.snapshot(),
            eeg_spectrum,
            ppg_spectrum,
            upstream_bands: self.upstream_bands.clone(),
            sample_rate: self.sample_rate,
        })
    }

    /// Drain the inbox and derive this frame's metrics
    pub fn tick(&mut self) -> TickOutcome {
        self.drain_inbox();
        match self.snapshot() {
            Some(snapshot) => TickOutcome::Ready(DerivedMetrics::compute(&snapshot, &self.config)),
            None => TickOutcome::Waiting,
        }
    }

    /// Forget all received data
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.eeg_spectrum = None;
        self.ppg_spectrum = None;
        self.upstream_bands = None;
        self.sample_rate = None;
        self.received = false;
    }
}

fn decode_spectrum(stream: &str, payload: &SpectrumPayload) -> Option<SpectrumSnapshot> {
    match SpectrumSnapshot::from_payload(payload) {
        Ok(spectrum) => Some(spectrum),
        Err(e) => {
            warn!(stream, error = %e, "discarding malformed spectrum");
            None
        }
    }
}
