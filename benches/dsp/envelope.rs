//! Benchmarks for the exponential decay envelope.

use std::hint::black_box;

use clockly_tones::dsp::DecayEnvelope;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![1.0f32; size];

        // Decaying: the envelope never runs out during the benchmark
        let mut env = DecayEnvelope::new(0.3, 0.01, u64::MAX);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.apply(black_box(&mut buffer));
            })
        });

        // Finished: every sample is silence
        let mut env = DecayEnvelope::new(0.3, 0.01, 1);
        env.next_sample();
        group.bench_with_input(BenchmarkId::new("finished", size), &size, |b, _| {
            b.iter(|| {
                env.apply(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
