/*
Exponential Decay Envelope
==========================

Alert tones use a one-shot envelope: the gain jumps to `peak` when the tone
starts and falls exponentially to `floor` exactly when it stops. A tone that
ends at a small but non-zero gain fades rather than clicks off.

Vocabulary
----------

  peak        Gain at the first sample of the tone (0.3 for the built-in
              voicing, leaving headroom for overlapping alerts).

  floor       Gain reached at the last instant of the tone (0.01). Must be
              strictly positive: an exponential never reaches zero.

  length      Tone duration in samples.

  ratio       Per-sample multiplier that takes `peak` to `floor` in
              `length` samples.


The Shape
---------

  Gain
  peak ┐╲
       │ ╲
       │  ╲_
       │    ╲__
       │       ╲___
  floor│           ╲______│
     0 └──────────────────┴──→ Time
       start            stop

    gain(n) = peak * (floor / peak) ^ (n / length)

Stepping this with a single multiply per sample:

    ratio   = (floor / peak) ^ (1 / length)
    gain(n + 1) = gain(n) * ratio

Example: 100 ms at 48 kHz, 0.3 → 0.01
  - length = 4800 samples
  - ratio  = (0.01 / 0.3) ^ (1 / 4800) ≈ 0.999291
  - after 4800 multiplies the gain is 0.01


Implementation Notes
--------------------

Floating-point drift over long tones is bounded by clamping to `floor`; the
envelope never undershoots it. Past `length` samples the envelope reports
inactive and outputs zero.
*/

#[derive(Debug, Clone, Copy)]
pub struct DecayEnvelope {
    peak: f32,
    floor: f32,
    ratio: f32,
    length: u64,
    elapsed: u64,
    gain: f32,
}

impl DecayEnvelope {
    /// `peak` and `floor` are clamped into (0, 1]; `length` of zero is
    /// treated as a single sample.
    pub fn new(peak: f32, floor: f32, length: u64) -> Self {
        let peak = peak.clamp(f32::MIN_POSITIVE, 1.0);
        let floor = floor.clamp(f32::MIN_POSITIVE, peak);
        let length = length.max(1);
        let ratio = (floor / peak).powf(1.0 / length as f32);

        Self {
            peak,
            floor,
            ratio,
            length,
            elapsed: 0,
            gain: peak,
        }
    }

    /// Gain for the current sample, then advance by one.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.elapsed >= self.length {
            return 0.0;
        }

        let current = self.gain;
        self.elapsed += 1;
        self.gain = (self.gain * self.ratio).max(self.floor);

        debug_assert!(current <= self.peak);
        current
    }

    /// Multiply a block of samples by the envelope in place.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next_sample();
        }
    }

    pub fn is_active(&self) -> bool {
        self.elapsed < self.length
    }

    /// Gain the next call to `next_sample` will return.
    pub fn level(&self) -> f32 {
        if self.is_active() {
            self.gain
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.gain = self.peak;
    }
}
