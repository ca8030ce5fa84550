use crate::{
    backend::ScheduledTone,
    dsp::{DecayEnvelope, Oscillator, Waveform},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,     // Available for allocation
    Pending,  // Holding a tone whose start frame has not been reached
    Sounding, // Between start and stop frames
}

/// A single voice rendering one scheduled tone, frame-accurately.
pub struct ToneVoice {
    osc: Oscillator,
    env: DecayEnvelope,
    start_frame: u64,
    stop_frame: u64,
    state: VoiceState,
}

/// Convert clock seconds to the nearest frame; negative times clamp to 0.
pub fn seconds_to_frame(seconds: f64, sample_rate: f32) -> u64 {
    (seconds * f64::from(sample_rate)).round().max(0.0) as u64
}

impl ToneVoice {
    pub fn new() -> Self {
        Self {
            osc: Oscillator::new(Waveform::Sine, 0.0, 1.0),
            env: DecayEnvelope::new(1.0, 1.0, 1),
            start_frame: 0,
            stop_frame: 0,
            state: VoiceState::Free,
        }
    }

    /// Load a tone. `now` is the first frame of the next rendered block; a
    /// tone that should already be sounding is fast-forwarded so it still
    /// ends on its stop frame at the right point of its decay.
    pub fn start(&mut self, tone: &ScheduledTone, sample_rate: f32, now: u64) {
        let start_frame = seconds_to_frame(tone.start, sample_rate);
        let stop_frame = seconds_to_frame(tone.stop, sample_rate).max(start_frame + 1);

        self.osc = Oscillator::new(tone.waveform, tone.frequency_hz, sample_rate);
        self.env = DecayEnvelope::new(tone.peak_gain, tone.floor_gain, stop_frame - start_frame);
        self.start_frame = start_frame;
        self.stop_frame = stop_frame;

        if now >= stop_frame {
            self.free();
            return;
        }

        for _ in start_frame..now.max(start_frame) {
            self.osc.next_sample();
            self.env.next_sample();
        }

        self.state = if now >= start_frame {
            VoiceState::Sounding
        } else {
            VoiceState::Pending
        };
    }

    /// Add this voice into `out`, whose first sample is frame `block_start`.
    pub fn render(&mut self, out: &mut [f32], block_start: u64) {
        if self.is_free() {
            return;
        }

        if block_start >= self.stop_frame {
            self.free();
            return;
        }

        let block_end = block_start + out.len() as u64;
        if block_end <= self.start_frame {
            return;
        }

        let first = self.start_frame.saturating_sub(block_start) as usize;
        let last = (self.stop_frame.min(block_end) - block_start) as usize;
        self.state = VoiceState::Sounding;

        for sample in &mut out[first..last] {
            *sample += self.osc.next_sample() * self.env.next_sample();
        }

        if block_end >= self.stop_frame {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    /// Gain the envelope will apply to the next rendered sample.
    pub fn envelope_level(&self) -> f32 {
        match self.state {
            VoiceState::Sounding => self.env.level(),
            _ => 0.0,
        }
    }
}

impl Default for ToneVoice {
    fn default() -> Self {
        Self::new()
    }
}
