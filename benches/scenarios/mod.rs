//! Real-world scenario benchmarks.
//!
//! Whole catalog sounds, from scheduling through the mixer's render path.

mod mixer;
mod schedule;

pub use mixer::bench_mixer;
pub use schedule::bench_schedule;
