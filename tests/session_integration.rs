// tests/session_integration.rs
//! End-to-end tests: JSON frames in through the session inbox, metrics out of `tick`

use biosignal_core::config::{BandAggregation, BandPowerSource, ConfigLoader, HeartRateWindow};
use biosignal_core::processing::Band;
use biosignal_core::protocol::{SpectrumPayload, WindowFrame};
use biosignal_core::{
    Channel, CoreConfig, Electrode, JoystickAxis, NanPolicy, SampleFrame, SignalSession, StreamMessage,
    TickOutcome,
};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::io::Write;
use std::thread;
use tempfile::NamedTempFile;

fn ready(outcome: TickOutcome) -> biosignal_core::DerivedMetrics {
    match outcome {
        TickOutcome::Ready(metrics) => metrics,
        TickOutcome::Waiting => panic!("session still waiting"),
    }
}

/// PPG spectrum with a single peak at 1.0 Hz
fn pulse_spectrum() -> SpectrumPayload {
    SpectrumPayload {
        frequency_buckets: vec![0.0, 0.5, 1.0, 1.5, 2.0],
        fft: vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![10.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ],
    }
}

#[test]
fn test_json_window_end_to_end() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();

    let json = r#"{
        "version": 1,
        "type": "window",
        "eeg_bands": {
            "delta": [4.0, 4.0, 4.0, 4.0, 0.0],
            "theta": [1.0, 1.0, 1.0, 1.0, 0.0],
            "alpha": [3.0, 0.0, 0.0, 3.0, 0.0],
            "beta":  [1.0, 1.0, 1.0, 1.0, 0.0],
            "gamma": [2.0, 2.0, 2.0, 2.0, 0.0]
        },
        "sample_rate": 256.0
    }"#;
    session.ingest_json(json).unwrap();

    let metrics = ready(session.tick());

    let spatial = metrics.spatial.unwrap();
    let alpha = spatial.band(Band::Alpha).unwrap();
    assert_eq!(alpha.x, 0.0);
    assert!(alpha.y > 0.0);

    let balances = metrics.balances.unwrap();
    assert!(balances.delta_vs_gamma.iter().all(|(_, b)| b.difference() == 2.0));
    assert!(metrics.heart_rate_bpm.is_none());
}

#[test]
fn test_transport_thread_feeds_inbox() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    assert!(session.tick().is_waiting());

    let sender = session.sender();
    let transport = thread::spawn(move || {
        for i in 0..20 {
            let value = i as f64;
            sender
                .send(StreamMessage::samples(SampleFrame {
                    eeg: vec![value; 5],
                    ppg: vec![value; 3],
                    joystick: Some([value, -value]),
                }))
                .unwrap();
        }
    });
    transport.join().unwrap();

    let metrics = ready(session.tick());
    let smoothed = metrics.smoothed.unwrap();

    // 20 samples with the default window of 10 leave 11 averages
    let (_, tp9) = smoothed.iter().find(|(c, _)| *c == Channel::Eeg(Electrode::Tp9)).unwrap();
    assert_eq!(tp9.len(), 11);
    assert_eq!(tp9[0], 4.5);

    let (_, joystick_y) = smoothed
        .iter()
        .find(|(c, _)| *c == Channel::Joystick(JoystickAxis::Y))
        .unwrap();
    assert_eq!(joystick_y[10], -14.5);
    assert_eq!(session.buffer_metrics().samples_received, 20 * 10);
}

#[test]
fn test_heart_rate_from_upstream_spectrum() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    session
        .ingest(StreamMessage::window(WindowFrame {
            ppg_spectrum: Some(pulse_spectrum()),
            ..WindowFrame::default()
        }))
        .unwrap();

    let metrics = ready(session.tick());
    assert_eq!(metrics.heart_rate_bpm, Some(60.0));
    assert!(metrics.bands.is_none());
    assert!(metrics.spatial.is_none());
}

#[test]
fn test_bucket_index_heart_rate_window() {
    let mut config = CoreConfig::default();
    config.heart_rate.window = HeartRateWindow::BucketIndex { start: 3, end: 6 };
    let mut session = SignalSession::new(config).unwrap();
    session
        .ingest(StreamMessage::window(WindowFrame {
            ppg_spectrum: Some(pulse_spectrum()),
            ..WindowFrame::default()
        }))
        .unwrap();

    // the only peak lies outside buckets 3..=4, so there is no pulse
    let metrics = ready(session.tick());
    assert_eq!(metrics.heart_rate_bpm, None);
}

#[test]
fn test_local_spectrum_derives_bands() {
    let mut config = CoreConfig::default();
    config.bands.source = BandPowerSource::Derive;
    config.bands.aggregation = BandAggregation::Max;
    let mut session = SignalSession::new(config).unwrap();

    // 10 Hz alpha on the rear electrodes, sampled at the default 256 Hz
    let rows: Vec<Vec<f64>> = (0..512)
        .map(|i| {
            let t = i as f64 / 256.0;
            let alpha = (2.0 * PI * 10.0 * t).sin();
            vec![5.0 * alpha, 0.1 * alpha, 0.1 * alpha, 5.0 * alpha, 0.0]
        })
        .collect();
    session
        .ingest(StreamMessage::window(WindowFrame {
            eeg_buffer: Some(rows),
            ..WindowFrame::default()
        }))
        .unwrap();

    let metrics = ready(session.tick());
    let bands = metrics.bands.unwrap();
    assert!(bands.get(Band::Alpha, 0).unwrap() > bands.get(Band::Alpha, 1).unwrap());

    let alpha = metrics.spatial.unwrap().band(Band::Alpha).unwrap();
    assert!(alpha.y > 0.0);
    assert!(alpha.x.abs() < 1e-9);

    let harmonics = metrics.harmonics.unwrap();
    assert_eq!(harmonics.len(), 4);
}

#[test]
fn test_local_spectrum_disabled() {
    let mut config = CoreConfig::default();
    config.spectrum.compute_locally = false;
    let mut session = SignalSession::new(config).unwrap();

    let rows = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]; 64];
    session
        .ingest(StreamMessage::window(WindowFrame {
            eeg_buffer: Some(rows),
            ..WindowFrame::default()
        }))
        .unwrap();

    let metrics = ready(session.tick());
    assert!(metrics.smoothed.is_some());
    assert!(metrics.bands.is_none());
    assert!(metrics.harmonics.is_none());
}

#[test]
fn test_strict_policy_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[buffers]\neeg_capacity = 4\nnan_policy = \"strict\"\ninclude_aux = false\n\n[smoothing]\nwindow = 2"
    )
    .unwrap();

    let config = ConfigLoader::with_paths(vec![file.path().into()])
        .with_env_prefix("BIOSIGNAL_SESSION_TEST_")
        .load()
        .unwrap();
    assert_eq!(config.buffers.nan_policy, NanPolicy::Strict);

    let mut session = SignalSession::new(config).unwrap();
    for value in [1.0, f64::NAN, 3.0, 5.0, 7.0, 9.0] {
        session
            .ingest(StreamMessage::samples(SampleFrame {
                eeg: vec![value; 4],
                ..SampleFrame::default()
            }))
            .unwrap();
    }

    let snapshot = session.snapshot().unwrap();
    let (_, tp9) = &snapshot.series[0];
    assert_eq!(tp9, &vec![3.0, 5.0, 7.0, 9.0]);
    assert_eq!(session.buffer_metrics().samples_dropped, 4);
    assert!(session.buffers().buffer(Channel::Eeg(Electrode::RightAux)).is_none());
}

#[test]
fn test_unsupported_version_is_rejected() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    let result = session.ingest_json(r#"{"version": 2, "type": "samples", "eeg": [1.0]}"#);

    assert!(result.is_err());
    assert!(session.tick().is_waiting());
}

#[test]
fn test_bad_message_on_inbox_does_not_block_others() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    let sender = session.sender();

    let mut stale = StreamMessage::samples(SampleFrame::default());
    stale.version = 0;
    sender.send(stale).unwrap();
    sender
        .send(StreamMessage::window(WindowFrame {
            eeg_bands: Some(BTreeMap::from([(Band::Alpha, vec![1.0, 2.0, 3.0, 4.0])])),
            ..WindowFrame::default()
        }))
        .unwrap();

    assert_eq!(session.drain_inbox(), 1);
    let metrics = ready(session.tick());

    // incomplete band table: balances for alpha only, no spatial map
    assert!(metrics.spatial.is_none());
    let balances = metrics.balances.unwrap();
    assert_eq!(balances.right_vs_left.len(), 1);
    assert_eq!(balances.right_vs_left[0].1.difference(), (3.0 + 4.0) - (1.0 + 2.0));
}

#[test]
fn test_four_channel_samples_with_default_config() {
    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    assert!(session.buffers().buffer(Channel::Eeg(Electrode::RightAux)).is_some());

    // the headband streams four EEG values; the aux buffer never fills
    for i in 0..512 {
        let t = i as f64 / 256.0;
        let alpha = (2.0 * PI * 10.0 * t).sin();
        session
            .ingest(StreamMessage::samples(SampleFrame {
                eeg: vec![5.0 * alpha, 0.1 * alpha, 0.1 * alpha, 5.0 * alpha],
                ppg: vec![1.0, 2.0, 3.0],
                joystick: None,
            }))
            .unwrap();
    }

    let metrics = ready(session.tick());
    let bands = metrics.bands.unwrap();
    assert!(bands.get(Band::Alpha, 0).unwrap() > 0.0);
    assert!(bands.get(Band::Alpha, 0).unwrap() > bands.get(Band::Alpha, 1).unwrap());
    assert!(metrics.spatial.is_some());
    assert!(metrics.balances.is_some());
    assert_eq!(metrics.harmonics.unwrap().len(), 4);
}

#[test]
fn test_lenient_gaps_do_not_poison_local_spectra() {
    let mut config = CoreConfig::default();
    config.bands.source = BandPowerSource::Derive;
    assert_eq!(config.buffers.nan_policy, NanPolicy::Lenient);
    let mut session = SignalSession::new(config).unwrap();

    let mut eeg: Vec<Vec<f64>> = (0..512)
        .map(|i| {
            let t = i as f64 / 256.0;
            let alpha = (2.0 * PI * 10.0 * t).sin();
            vec![5.0 * alpha, 0.1 * alpha, 0.1 * alpha, 5.0 * alpha]
        })
        .collect();
    eeg[100][0] = f64::NAN;

    // 1.2 Hz pulse at the default 64 Hz PPG rate
    let mut ppg: Vec<Vec<f64>> = (0..1280)
        .map(|i| {
            let t = i as f64 / 64.0;
            vec![(2.0 * PI * 1.2 * t).sin(), 0.0, 0.0]
        })
        .collect();
    ppg[300][0] = f64::NAN;

    session
        .ingest(StreamMessage::window(WindowFrame {
            eeg_buffer: Some(eeg),
            ppg_buffer: Some(ppg),
            ..WindowFrame::default()
        }))
        .unwrap();

    let metrics = ready(session.tick());

    let bands = metrics.bands.unwrap();
    let tp9_alpha = bands.get(Band::Alpha, 0).unwrap();
    assert!(tp9_alpha.is_finite() && tp9_alpha > 0.0, "TP9 alpha {}", tp9_alpha);

    let harmonics = metrics.harmonics.unwrap();
    let (electrode, tp9) = harmonics[0];
    assert_eq!(electrode, Electrode::Tp9);
    assert!(tp9.variance.is_finite());
    assert!(tp9.harmonic_variance.is_finite());

    let bpm = metrics.heart_rate_bpm.unwrap();
    assert!((60.0..90.0).contains(&bpm), "heart rate {} bpm", bpm);
}
