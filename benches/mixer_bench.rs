//! Benchmarks for tone rendering.
//!
//! Run with: cargo bench
//!
//! The mixer runs inside the audio callback, so every block has to finish
//! well within its real-time deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Oscillator and decay envelope
//!   - scenarios/*  Whole sounds through the mixer, and scheduling

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_envelope,
    scenarios::bench_mixer,
    scenarios::bench_schedule,
);
criterion_main!(benches);
