//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use clockly_tones::dsp::{Oscillator, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (label, waveform) in [
            ("sine", Waveform::Sine),
            ("square", Waveform::Square),
            ("triangle", Waveform::Triangle),
            ("sawtooth", Waveform::Sawtooth),
        ] {
            let mut osc = Oscillator::new(waveform, 880.0, 48_000.0);
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
