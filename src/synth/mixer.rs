use crate::{
    synth::{message::ToneReceiver, voice::ToneVoice},
    MAX_BLOCK_SIZE,
};

/// Voice pool that renders every tone scheduled on one session clock.
///
/// The pool is allocated up front; `render_block` never allocates, so the
/// mixer can run inside an audio callback. Tones that arrive while every
/// voice is busy are dropped and counted.
pub struct ToneMixer<R: ToneReceiver> {
    voices: Vec<ToneVoice>,
    rx: R,
    sample_rate: f32,
    frame: u64,
    dropped: u64,
}

impl<R: ToneReceiver> ToneMixer<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        let voices = (0..max_voices.max(1)).map(|_| ToneVoice::new()).collect();

        Self {
            voices,
            rx,
            sample_rate,
            frame: 0,
            dropped: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        // Pick up newly scheduled tones
        while let Some(tone) = self.rx.pop() {
            match self.voices.iter_mut().find(|v| v.is_free()) {
                Some(voice) => voice.start(&tone, self.sample_rate, self.frame),
                None => self.dropped += 1,
            }
        }

        // Mix voices
        out.fill(0.0);
        for voice in &mut self.voices {
            voice.render(out, self.frame);
        }

        self.frame += out.len() as u64;
    }

    /// Render an interleaved device buffer, duplicating mono to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize, scratch: &mut [f32]) {
        let channels = channels.max(1);
        if scratch.is_empty() {
            data.fill(0.0);
            return;
        }

        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written)
                .min(MAX_BLOCK_SIZE)
                .min(scratch.len());
            let block = &mut scratch[..frames_to_render];
            self.render_block(block);

            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            frames_written += frames_to_render;
        }
    }

    /// Frames rendered so far; the session clock in samples.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Session clock in seconds.
    pub fn time(&self) -> f64 {
        self.frame as f64 / f64::from(self.sample_rate)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    pub fn is_idle(&self) -> bool {
        self.active_voices() == 0
    }

    /// Tones dropped because the voice pool was full.
    pub fn dropped_tones(&self) -> u64 {
        self.dropped
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.rx
    }
}
