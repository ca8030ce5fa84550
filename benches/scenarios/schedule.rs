//! Benchmarks for turning segments into scheduled tones.

use std::hint::black_box;

use clockly_tones::{backend::RecordingHost, schedule_segments, AudioHost, Catalog, ToneShape};
use criterion::Criterion;

pub fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/schedule");
    let catalog = Catalog::builtin();
    let shape = ToneShape::default();
    let host = RecordingHost::new();

    for name in ["Bell", "Sparkle"] {
        let Some(sound) = catalog.get(name) else {
            continue;
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                host.clear();
                let mut ctx = host.open_context().unwrap();
                schedule_segments(&mut ctx, black_box(sound.segments()), &shape).unwrap()
            })
        });
    }

    group.finish();
}
