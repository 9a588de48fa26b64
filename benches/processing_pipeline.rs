use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use biosignal_core::acquisition::{NanPolicy, SampleBuffer};
use biosignal_core::config::BandAggregation;
use biosignal_core::processing::{
    BandPowerExtractor, HarmonicVarianceAnalyzer, MovingAverageSmoother, SpectrumAnalyzer,
};
use biosignal_core::protocol::WindowFrame;
use biosignal_core::{CoreConfig, SignalSession, StreamMessage};
use rand::Rng;

const BUFFER_SIZES: &[usize] = &[500, 1280, 5000];
const SMOOTHING_WINDOWS: &[usize] = &[5, 10, 50];

fn noise(len: usize, channels: usize) -> Vec<Vec<f64>> {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| (0..channels).map(|_| rng.gen_range(-100.0..100.0)).collect())
        .collect()
}

fn benchmark_sample_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_buffer");

    for &capacity in BUFFER_SIZES {
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(BenchmarkId::new("push_full", capacity), &capacity, |b, &capacity| {
            let mut buffer = SampleBuffer::new(capacity, NanPolicy::Lenient).unwrap();
            buffer.extend((0..capacity).map(|i| i as f64));

            b.iter(|| {
                for i in 0..1000 {
                    buffer.push(black_box(i as f64));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing");
    let series: Vec<f64> = noise(1280, 1).into_iter().map(|row| row[0]).collect();

    for &window in SMOOTHING_WINDOWS {
        let smoother = MovingAverageSmoother::new(window).unwrap();
        group.bench_with_input(BenchmarkId::new("moving_average", window), &series, |b, series| {
            b.iter(|| smoother.smooth(black_box(series)));
        });
    }

    group.finish();
}

fn benchmark_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrum");

    for &len in BUFFER_SIZES {
        let rows = noise(len, 5);
        let mut analyzer = SpectrumAnalyzer::new(256.0).unwrap();
        group.bench_with_input(BenchmarkId::new("analyze_5ch", len), &rows, |b, rows| {
            b.iter(|| analyzer.analyze(black_box(rows)));
        });

        let spectrum = analyzer.analyze(&rows).unwrap();
        let extractor = BandPowerExtractor::new(BandAggregation::Max);
        group.bench_with_input(BenchmarkId::new("band_table", len), &spectrum, |b, spectrum| {
            b.iter(|| extractor.table(black_box(spectrum)));
        });

        let magnitudes = spectrum.channel_vec(0).unwrap();
        group.bench_with_input(BenchmarkId::new("harmonic_variance", len), &magnitudes, |b, m| {
            b.iter(|| HarmonicVarianceAnalyzer.harmonic_variance(black_box(m)));
        });
    }

    group.finish();
}

fn benchmark_session_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    let mut session = SignalSession::new(CoreConfig::default()).unwrap();
    session
        .ingest(StreamMessage::window(WindowFrame {
            eeg_buffer: Some(noise(1280, 5)),
            ppg_buffer: Some(noise(1280, 3)),
            ..WindowFrame::default()
        }))
        .unwrap();

    group.bench_function("tick_full_buffers", |b| {
        b.iter(|| black_box(session.tick()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sample_buffer,
    benchmark_smoothing,
    benchmark_spectrum,
    benchmark_session_tick
);
criterion_main!(benches);
