//! A host that records instead of playing.
//!
//! The clock is a plain value the caller sets, which makes schedules exactly
//! reproducible. Used by the test suite and by anything that wants to inspect
//! what a sound would schedule without opening an audio device.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{AudioContext, AudioHost, BackendError, ScheduledTone};

#[derive(Debug, Default)]
struct RecordingState {
    clock: f64,
    sessions: Vec<Vec<ScheduledTone>>,
}

#[derive(Debug, Clone)]
pub struct RecordingHost {
    state: Arc<Mutex<RecordingState>>,
    available: bool,
    fail_after: Option<usize>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// A host whose clock already reads `seconds`.
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState {
                clock: seconds,
                sessions: Vec::new(),
            })),
            available: true,
            fail_after: None,
        }
    }

    /// A host that refuses to open any session.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Every session accepts `tones` tones, then rejects the rest.
    pub fn failing_after(mut self, tones: usize) -> Self {
        self.fail_after = Some(tones);
        self
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_time(&self, seconds: f64) {
        self.lock().clock = seconds;
    }

    pub fn advance(&self, seconds: f64) {
        self.lock().clock += seconds;
    }

    pub fn time(&self) -> f64 {
        self.lock().clock
    }

    /// Number of sessions opened so far.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Tones grouped by the session that scheduled them.
    pub fn sessions(&self) -> Vec<Vec<ScheduledTone>> {
        self.lock().sessions.clone()
    }

    /// Every recorded tone, in scheduling order.
    pub fn tones(&self) -> Vec<ScheduledTone> {
        self.lock().sessions.iter().flatten().copied().collect()
    }

    pub fn clear(&self) {
        self.lock().sessions.clear();
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for RecordingHost {
    type Context = RecordingContext;

    fn open_context(&self) -> Result<Self::Context, BackendError> {
        if !self.available {
            return Err(BackendError::Unavailable);
        }

        let mut state = self.lock();
        state.sessions.push(Vec::new());

        Ok(RecordingContext {
            state: Arc::clone(&self.state),
            session: state.sessions.len() - 1,
            remaining: self.fail_after,
        })
    }
}

pub struct RecordingContext {
    state: Arc<Mutex<RecordingState>>,
    session: usize,
    remaining: Option<usize>,
}

impl RecordingContext {
    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioContext for RecordingContext {
    fn current_time(&self) -> f64 {
        self.lock().clock
    }

    fn schedule_tone(&mut self, tone: ScheduledTone) -> Result<(), BackendError> {
        tone.validate()?;

        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Err(BackendError::QueueFull);
            }
            *remaining -= 1;
        }

        let session = self.session;
        self.lock().sessions[session].push(tone);
        Ok(())
    }
}
