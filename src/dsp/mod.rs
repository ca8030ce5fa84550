//! Low-level DSP primitives used by the tone voices.
//!
//! These components are allocation-free and realtime-safe, so they can live
//! directly inside voice structs rendered from the audio callback.

/// One-shot exponential gain ramp from peak to floor.
pub mod envelope;
/// Phase-accumulator oscillator and its waveforms.
pub mod oscillator;

pub use envelope::DecayEnvelope;
pub use oscillator::{Oscillator, Waveform};
