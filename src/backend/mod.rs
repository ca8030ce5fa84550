//! Audio backends the sequencer schedules against.
//!
//! An [`AudioHost`] opens one [`AudioContext`] per playback session. The
//! context exposes a monotonic clock in seconds and accepts tones scheduled at
//! absolute times on that clock. Dropping the context ends the caller's part
//! of the session: the host keeps rendering until the last scheduled stop
//! time and then releases whatever it allocated.

#[cfg(feature = "rtrb")]
pub mod cpal_host;
pub mod offline;
pub mod recording;

use std::time::Duration;

use thiserror::Error;

use crate::dsp::Waveform;

#[cfg(feature = "rtrb")]
pub use cpal_host::CpalHost;
pub use offline::OfflineHost;
pub use recording::RecordingHost;

/// Longest single tone a host accepts.
pub const MAX_TONE_LENGTH: Duration = Duration::from_secs(600);

/// A tone placed on a session clock.
///
/// The gain is `peak_gain` at `start` and ramps exponentially to
/// `floor_gain` at `stop`, where the tone ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub start: f64,
    pub stop: f64,
    pub peak_gain: f32,
    pub floor_gain: f32,
}

impl ScheduledTone {
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    pub fn validate(&self) -> Result<(), BackendError> {
        let valid = self.frequency_hz.is_finite()
            && self.frequency_hz > 0.0
            && self.start.is_finite()
            && self.stop.is_finite()
            && self.stop > self.start
            && self.duration() <= MAX_TONE_LENGTH.as_secs_f64()
            && self.floor_gain > 0.0
            && self.floor_gain < self.peak_gain
            && self.peak_gain <= 1.0;

        if valid {
            Ok(())
        } else {
            Err(BackendError::InvalidTone(*self))
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("audio output is not available on this host")]
    Unavailable,

    #[error("no audio host with an output device (tried: {tried})")]
    NoOutputDevice { tried: String },

    #[error("failed to query default output config: {0}")]
    DefaultConfig(String),

    #[error("unsupported output sample format {0}")]
    UnsupportedSampleFormat(String),

    #[error("failed to build output stream: {0}")]
    BuildStream(String),

    #[error("failed to start output stream: {0}")]
    PlayStream(String),

    #[error("session queue is full")]
    QueueFull,

    #[error("session thread exited before the stream was ready")]
    SessionClosed,

    #[error("output stream did not start within {0:?}")]
    OpenTimeout(Duration),

    #[error("failed to spawn session thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("rejected tone {0:?}")]
    InvalidTone(ScheduledTone),
}

/// One playback session's view of the backend.
pub trait AudioContext {
    /// Current time on the session clock, in seconds.
    fn current_time(&self) -> f64;

    fn schedule_tone(&mut self, tone: ScheduledTone) -> Result<(), BackendError>;
}

/// Factory for playback sessions.
pub trait AudioHost: Send + Sync {
    type Context: AudioContext;

    fn open_context(&self) -> Result<Self::Context, BackendError>;
}

impl<H: AudioHost + ?Sized> AudioHost for &H {
    type Context = H::Context;

    fn open_context(&self) -> Result<Self::Context, BackendError> {
        (**self).open_context()
    }
}

impl<H: AudioHost + ?Sized> AudioHost for std::sync::Arc<H> {
    type Context = H::Context;

    fn open_context(&self) -> Result<Self::Context, BackendError> {
        (**self).open_context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone() -> ScheduledTone {
        ScheduledTone {
            frequency_hz: 440.0,
            waveform: Waveform::Sine,
            start: 1.0,
            stop: 1.25,
            peak_gain: 0.3,
            floor_gain: 0.01,
        }
    }

    #[test]
    fn accepts_well_formed_tone() {
        assert!(tone().validate().is_ok());
        assert!((tone().duration() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn rejects_silent_or_backwards_tones() {
        let silent = ScheduledTone {
            frequency_hz: 0.0,
            ..tone()
        };
        assert!(matches!(silent.validate(), Err(BackendError::InvalidTone(_))));

        let backwards = ScheduledTone { stop: 0.5, ..tone() };
        assert!(backwards.validate().is_err());

        let inverted_gain = ScheduledTone {
            floor_gain: 0.5,
            ..tone()
        };
        assert!(inverted_gain.validate().is_err());

        let flat_gain = ScheduledTone {
            floor_gain: 0.3,
            ..tone()
        };
        assert!(flat_gain.validate().is_err());
    }

    #[test]
    fn rejects_unbounded_tones() {
        let endless = ScheduledTone {
            stop: f64::INFINITY,
            ..tone()
        };
        assert!(endless.validate().is_err());

        let too_long = ScheduledTone {
            stop: 1.0 + MAX_TONE_LENGTH.as_secs_f64() + 1.0,
            ..tone()
        };
        assert!(too_long.validate().is_err());

        let longest = ScheduledTone {
            stop: 1.0 + MAX_TONE_LENGTH.as_secs_f64(),
            ..tone()
        };
        assert!(longest.validate().is_ok());
    }
}
