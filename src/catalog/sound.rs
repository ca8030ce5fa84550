use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Longest segment accepted anywhere: ten minutes.
pub const MAX_SEGMENT_MS: f32 = 600_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentError {
    #[error("non-positive duration {0} ms")]
    Duration(f32),

    #[error("duration {0} ms exceeds {MAX_SEGMENT_MS} ms")]
    TooLong(f32),

    #[error("invalid frequency {0} Hz")]
    Frequency(f32),
}

/// One step of a sound's timeline: a tone at `frequency_hz` or, when the
/// frequency is exactly zero, a rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub frequency_hz: f32,
    pub duration_ms: f32,
}

impl Segment {
    pub const fn tone(frequency_hz: f32, duration_ms: f32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    pub const fn rest(duration_ms: f32) -> Self {
        Self {
            frequency_hz: 0.0,
            duration_ms,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.frequency_hz == 0.0
    }

    /// Durations must be finite, positive and at most [`MAX_SEGMENT_MS`];
    /// frequencies finite and non-negative.
    pub fn validate(&self) -> Result<(), SegmentError> {
        // NaN fails both comparisons
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return Err(SegmentError::Duration(self.duration_ms));
        }
        if self.duration_ms > MAX_SEGMENT_MS {
            return Err(SegmentError::TooLong(self.duration_ms));
        }
        if !(self.frequency_hz.is_finite() && self.frequency_hz >= 0.0) {
            return Err(SegmentError::Frequency(self.frequency_hz));
        }
        Ok(())
    }

    /// Segment length on the audio clock.
    pub fn seconds(&self) -> f64 {
        f64::from(self.duration_ms) / 1000.0
    }
}

/// A named, ordered, non-empty list of segments.
///
/// Only constructed through [`crate::catalog::CatalogBuilder`], which checks
/// the segment invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundDefinition {
    name: String,
    segments: Vec<Segment>,
}

impl SoundDefinition {
    pub(crate) fn new(name: String, segments: Vec<Segment>) -> Self {
        Self { name, segments }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments that produce sound.
    pub fn tone_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_rest()).count()
    }

    /// Sum of every segment, rests included.
    pub fn duration(&self) -> Duration {
        let seconds: f64 = self.segments.iter().map(Segment::seconds).sum();
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}
