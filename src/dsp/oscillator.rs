use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/*
Phase-Accumulator Oscillator
============================

Every alert tone is a single oscillator held at a fixed pitch. The oscillator
keeps a normalized `phase` in [0, 1) and advances it by `frequency /
sample_rate` each sample; the waveform is a pure function of the phase.

    phase   0.0 ──────────── 0.5 ──────────── 1.0 (wraps to 0.0)
    sine    0 ↗ 1 ↘ 0 ↘ -1 ↗ 0
    square  +1 ............. -1 .............
    tri     -1 ↗ +1 ↘ -1
    saw     -1 ↗↗↗↗↗↗↗↗↗↗↗↗↗↗↗ +1 (snap)

Sine is the default and the only shape the built-in sounds were designed
around. The other shapes are naive (not band-limited); they alias audibly at
high pitches and are only offered as a voicing option.
*/

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Evaluate the waveform at a normalized phase in [0, 1).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    increment: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            increment: frequency / sample_rate,
        }
    }

    pub fn sine(frequency: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, frequency, sample_rate)
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase += self.increment;
        self.phase -= self.phase.floor();
        value
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Restart the waveform from phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}
