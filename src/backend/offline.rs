//! Faster-than-realtime rendering into memory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use super::{AudioContext, AudioHost, BackendError, ScheduledTone};
use crate::{synth::ToneMixer, MAX_BLOCK_SIZE};

/// Longest buffer a session renders, tail included.
pub const MAX_RENDER_LENGTH: Duration = Duration::from_secs(3600);

/// Render a set of tones on a clock starting at zero into a mono buffer long
/// enough to hold the last stop time plus `tail` seconds.
///
/// Fails with `InvalidTone` for any tone that is invalid or ends past
/// [`MAX_RENDER_LENGTH`].
pub fn render_tones(
    tones: &[ScheduledTone],
    sample_rate: f32,
    tail: f64,
) -> Result<Vec<f32>, BackendError> {
    let tail = clamp_tail(tail);
    for tone in tones {
        check_fits(tone, tail)?;
    }

    let end = tones.iter().map(|t| t.stop).fold(0.0f64, f64::max) + tail;
    let total_frames = (end * f64::from(sample_rate)).round() as usize;

    let queue: VecDeque<ScheduledTone> = tones.iter().copied().collect();
    let mut mixer = ToneMixer::new(sample_rate, tones.len(), queue);
    let mut out = vec![0.0f32; total_frames];

    for block in out.chunks_mut(MAX_BLOCK_SIZE) {
        mixer.render_block(block);
    }

    Ok(out)
}

fn clamp_tail(tail: f64) -> f64 {
    if tail.is_finite() {
        tail.clamp(0.0, MAX_RENDER_LENGTH.as_secs_f64())
    } else {
        0.0
    }
}

fn check_fits(tone: &ScheduledTone, tail: f64) -> Result<(), BackendError> {
    tone.validate()?;
    if tone.stop + tail > MAX_RENDER_LENGTH.as_secs_f64() {
        return Err(BackendError::InvalidTone(*tone));
    }
    Ok(())
}

/// A host whose sessions render to memory when they are dropped.
///
/// Each session clock starts at zero. Finished renders are collected in
/// session order and taken with [`OfflineHost::take_renders`].
#[derive(Debug, Clone)]
pub struct OfflineHost {
    sample_rate: f32,
    tail: f64,
    renders: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl OfflineHost {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            tail: 0.0,
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Extra silence appended after the last tone of every session.
    pub fn with_tail(mut self, seconds: f64) -> Self {
        self.tail = clamp_tail(seconds);
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn take_renders(&self) -> Vec<Vec<f32>> {
        let mut renders = self.renders.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *renders)
    }
}

impl AudioHost for OfflineHost {
    type Context = OfflineContext;

    fn open_context(&self) -> Result<Self::Context, BackendError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(BackendError::Unavailable);
        }

        Ok(OfflineContext {
            tones: Vec::new(),
            sample_rate: self.sample_rate,
            tail: self.tail,
            renders: Arc::clone(&self.renders),
        })
    }
}

pub struct OfflineContext {
    tones: Vec<ScheduledTone>,
    sample_rate: f32,
    tail: f64,
    renders: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl AudioContext for OfflineContext {
    fn current_time(&self) -> f64 {
        0.0
    }

    fn schedule_tone(&mut self, tone: ScheduledTone) -> Result<(), BackendError> {
        check_fits(&tone, self.tail)?;
        self.tones.push(tone);
        Ok(())
    }
}

impl Drop for OfflineContext {
    fn drop(&mut self) {
        let samples = match render_tones(&self.tones, self.sample_rate, self.tail) {
            Ok(samples) => samples,
            Err(err) => {
                warn!(%err, "offline session not rendered");
                return;
            }
        };
        debug!(
            tones = self.tones.len(),
            frames = samples.len(),
            "offline session rendered"
        );
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(samples);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::Waveform;

    fn tone(start: f64, stop: f64) -> ScheduledTone {
        ScheduledTone {
            frequency_hz: 220.0,
            waveform: Waveform::Sine,
            start,
            stop,
            peak_gain: 0.3,
            floor_gain: 0.01,
        }
    }

    #[test]
    fn render_covers_last_stop_plus_tail() {
        let samples = render_tones(&[tone(0.0, 0.1), tone(0.2, 0.3)], 1_000.0, 0.05).unwrap();
        assert_eq!(samples.len(), 350);
        assert!(samples[100..200].iter().all(|&s| s == 0.0));
        assert!(samples[300..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_session_renders_tail_only() {
        let samples = render_tones(&[], 1_000.0, 0.01).unwrap();
        assert_eq!(samples.len(), 10);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn sessions_render_on_drop() {
        let host = OfflineHost::new(8_000.0);
        {
            let mut ctx = host.open_context().unwrap();
            ctx.schedule_tone(tone(0.0, 0.25)).unwrap();
        }

        let renders = host.take_renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].len(), 2_000);
        assert!(renders[0].iter().any(|s| s.abs() > 0.1));
        assert!(host.take_renders().is_empty());
    }

    #[test]
    fn rejects_tones_past_the_render_limit() {
        let limit = MAX_RENDER_LENGTH.as_secs_f64();
        let late = tone(limit - 0.5, limit + 0.5);
        assert!(matches!(
            render_tones(&[late], 1_000.0, 0.0),
            Err(BackendError::InvalidTone(_))
        ));

        let host = OfflineHost::new(1_000.0).with_tail(f64::INFINITY);
        let mut ctx = host.open_context().unwrap();
        assert!(ctx.schedule_tone(late).is_err());
        assert!(ctx.schedule_tone(tone(0.0, f64::MAX)).is_err());
        ctx.schedule_tone(tone(0.0, 0.01)).unwrap();
        drop(ctx);

        assert_eq!(host.take_renders()[0].len(), 10);
    }
}
