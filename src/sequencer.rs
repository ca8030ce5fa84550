/*
Tone sequencer
==============

Turns a named sound into tones on an audio clock.

Vocabulary
----------
- Segment: (frequency, duration). Frequency 0 is a rest.
- Session: one `AudioContext`, opened per playback and dropped as soon as
  every segment is scheduled. The host keeps rendering after the drop.
- Cursor: the clock time the next segment starts at.

Scheduling
----------
The cursor starts at the session clock and every segment advances it by its
own duration, so segments sit back to back:

    Bell = (800,100) (1200,100) (800,200)

    t=0ms        100ms        200ms                 400ms
    |--- 800 ----|--- 1200 ---|-------- 800 --------|

    Beep = (800,100) (0,50) (800,100)

    t=0ms        100ms  150ms       250ms
    |--- 800 ----|      |--- 800 ---|
                 ^ rest: cursor moves, nothing scheduled

Every tone starts at `peak_gain` and decays exponentially to `floor_gain` at
its stop time, so tones fade instead of clicking off.

Failure
-------
`play_sound` only reports whether the name was found. A backend that cannot
open a session, or rejects a tone, abandons the rest of that render with a
warning. Tones already handed to the backend stay scheduled.

Raw segment lists are checked in full before anything is scheduled, with the
same rules the catalog builder applies, so a bad list schedules nothing.
*/

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    backend::{AudioContext, AudioHost, BackendError, ScheduledTone},
    catalog::{Catalog, CatalogMetadata, Category, Segment, SegmentError, SoundDefinition},
    dsp::Waveform,
};

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("segment {index}: {source}")]
    InvalidSegment {
        index: usize,
        #[source]
        source: SegmentError,
    },

    #[error("invalid gains: floor {floor_gain}, peak {peak_gain} (need 0 < floor < peak <= 1)")]
    InvalidShape { peak_gain: f32, floor_gain: f32 },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Waveform and envelope applied to every tone a sequencer schedules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneShape {
    #[serde(default)]
    pub waveform: Waveform,
    #[serde(default = "ToneShape::default_peak_gain")]
    pub peak_gain: f32,
    #[serde(default = "ToneShape::default_floor_gain")]
    pub floor_gain: f32,
}

impl ToneShape {
    fn default_peak_gain() -> f32 {
        0.3
    }

    fn default_floor_gain() -> f32 {
        0.01
    }

    /// `0 < floor_gain < peak_gain <= 1`; NaN gains fail.
    pub fn validate(&self) -> Result<(), SequenceError> {
        let valid = self.floor_gain > 0.0
            && self.floor_gain < self.peak_gain
            && self.peak_gain <= 1.0;
        if valid {
            Ok(())
        } else {
            Err(SequenceError::InvalidShape {
                peak_gain: self.peak_gain,
                floor_gain: self.floor_gain,
            })
        }
    }

    pub fn tone(&self, frequency_hz: f32, start: f64, stop: f64) -> ScheduledTone {
        ScheduledTone {
            frequency_hz,
            waveform: self.waveform,
            start,
            stop,
            peak_gain: self.peak_gain,
            floor_gain: self.floor_gain,
        }
    }
}

impl Default for ToneShape {
    fn default() -> Self {
        Self {
            waveform: Waveform::default(),
            peak_gain: Self::default_peak_gain(),
            floor_gain: Self::default_floor_gain(),
        }
    }
}

/// What one pass of [`schedule_segments`] put on the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSpan {
    /// Clock time of the first segment.
    pub start: f64,
    /// Cursor after the last segment, rests included.
    pub end: f64,
    /// Tone instructions issued.
    pub tones: usize,
}

impl SessionSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Schedule `segments` back to back starting at the context's current time.
///
/// Every segment is validated first; an invalid one schedules nothing. After
/// that, stops at the first rejected tone and earlier tones remain scheduled.
pub fn schedule_segments<C>(
    context: &mut C,
    segments: &[Segment],
    shape: &ToneShape,
) -> Result<SessionSpan, SequenceError>
where
    C: AudioContext + ?Sized,
{
    check_segments(segments)?;

    let start = context.current_time();
    let mut cursor = start;
    let mut tones = 0;

    for segment in segments {
        let length = segment.seconds();
        if !segment.is_rest() {
            context.schedule_tone(shape.tone(segment.frequency_hz, cursor, cursor + length))?;
            tones += 1;
        }
        cursor += length;
    }

    Ok(SessionSpan {
        start,
        end: cursor,
        tones,
    })
}

fn check_segments(segments: &[Segment]) -> Result<(), SequenceError> {
    for (index, segment) in segments.iter().enumerate() {
        segment
            .validate()
            .map_err(|source| SequenceError::InvalidSegment { index, source })?;
    }
    Ok(())
}

pub struct ToneSequencer<H: AudioHost> {
    catalog: Arc<Catalog>,
    host: H,
    shape: ToneShape,
}

impl<H: AudioHost> ToneSequencer<H> {
    pub fn new(catalog: Arc<Catalog>, host: H) -> Self {
        Self {
            catalog,
            host,
            shape: ToneShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: ToneShape) -> Result<Self, SequenceError> {
        shape.validate()?;
        self.shape = shape;
        Ok(self)
    }

    /// Start playing `name`. Returns false, with a warning that lists every
    /// valid name, when the catalog has no such sound.
    ///
    /// A true result only means the name resolved; audio failures are logged
    /// and never reported here.
    pub fn play_sound(&self, name: &str) -> bool {
        let Some(sound) = self.catalog.get(name) else {
            let available = self.catalog.names().collect::<Vec<_>>().join(", ");
            warn!(sound = name, %available, "unknown sound");
            return false;
        };

        debug!(sound = name, segments = sound.segments().len(), "playing sound");
        self.render_sequence(sound.segments());
        true
    }

    /// Every sound name in catalog order.
    pub fn list_sounds(&self) -> Vec<&str> {
        self.catalog.names().collect()
    }

    /// Schedule `segments` in a fresh session and return without waiting.
    pub fn render_sequence(&self, segments: &[Segment]) {
        if let Err(err) = self.try_render_sequence(segments) {
            warn!(%err, "render abandoned");
        }
    }

    /// [`render_sequence`](Self::render_sequence) with the error returned
    /// instead of logged.
    pub fn try_render_sequence(&self, segments: &[Segment]) -> Result<SessionSpan, SequenceError> {
        check_segments(segments)?;
        let mut context = self.host.open_context()?;
        let span = schedule_segments(&mut context, segments, &self.shape)?;
        debug!(
            start = span.start,
            end = span.end,
            tones = span.tones,
            "session scheduled"
        );
        Ok(span)
    }

    pub fn sound(&self, name: &str) -> Option<&SoundDefinition> {
        self.catalog.get(name)
    }

    pub fn categories(&self) -> &[Category] {
        self.catalog.categories()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        self.catalog.metadata()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn shape(&self) -> &ToneShape {
        &self.shape
    }
}
