//! Benchmarks for the tone mixer with real sounds queued.

use std::collections::VecDeque;
use std::hint::black_box;

use clockly_tones::{synth::ToneMixer, Catalog, ScheduledTone, ToneShape};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

/// Every tone of `names`, each sound starting at time zero.
fn tones_for(catalog: &Catalog, names: &[&str]) -> Vec<ScheduledTone> {
    let shape = ToneShape::default();
    let mut tones = Vec::new();
    for sound in names.iter().filter_map(|name| catalog.get(name)) {
        let mut cursor = 0.0;
        for segment in sound.segments() {
            let length = segment.seconds();
            if !segment.is_rest() {
                tones.push(shape.tone(segment.frequency_hz, cursor, cursor + length));
            }
            cursor += length;
        }
    }
    tones
}

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");
    let catalog = Catalog::builtin();

    // One alert: the common case
    let bell = tones_for(&catalog, &["Bell"]);
    // Every sound at once: worst case for overlapping alerts
    let names: Vec<&str> = catalog.names().collect();
    let everything = tones_for(&catalog, &names);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (label, tones) in [("bell", &bell), ("all_sounds", &everything)] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter_batched_ref(
                    || {
                        let queue: VecDeque<ScheduledTone> = tones.iter().copied().collect();
                        ToneMixer::new(SAMPLE_RATE, tones.len(), queue)
                    },
                    |mixer| mixer.render_block(black_box(&mut buffer)),
                    criterion::BatchSize::SmallInput,
                )
            });
        }

        // Idle pool: the cost of a callback with nothing scheduled
        let mut idle = ToneMixer::new(SAMPLE_RATE, 64, VecDeque::<ScheduledTone>::new());
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
