//! Realtime playback through cpal.
//!
//! Every session gets its own output stream, built and owned by a short-lived
//! session thread:
//!
//! ```text
//!   open_context()                     session thread
//!   ──────────────                     ──────────────
//!   spawn ───────────────────────────→ detect hosts, build + play stream
//!   wait for ready ←─────────────────  Ok(sample_rate) | Err(BackendError)
//!   schedule_tone() ──rtrb──→ audio callback: ToneMixer renders, bumps clock
//!   drop ── last stop time ──────────→ sleep until stop + tail, drop stream
//! ```
//!
//! The audio callback never locks or allocates; the only shared state is the
//! tone queue and an atomic frame counter that serves as the session clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, info, warn};

use super::{AudioContext, AudioHost, BackendError, ScheduledTone};
use crate::{config::AudioConfig, synth::ToneMixer, MAX_BLOCK_SIZE};

/// Slack on top of the scheduled end before a stalled stream is torn down.
const STALL_GRACE: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// Longest a session stays open after its caller lets go.
const MAX_SESSION_WAIT: Duration = Duration::from_secs(3600);
/// Longest `open_context` waits for the session thread to report a stream.
pub const OPEN_TIMEOUT: Duration = Duration::from_secs(2);

/// Real-time host.
///
/// `open_context` blocks its caller while the session thread detects hosts
/// and starts the output stream, at most [`OPEN_TIMEOUT`]. Scheduling after
/// that never blocks.
#[derive(Debug, Clone)]
pub struct CpalHost {
    preferred_hosts: Vec<String>,
    queue_capacity: usize,
    tail: Duration,
}

impl CpalHost {
    pub fn new() -> Self {
        Self::from_config(&AudioConfig::default())
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            preferred_hosts: config.hosts.clone(),
            queue_capacity: config.queue_capacity.max(1),
            tail: Duration::from_secs_f64(f64::from(config.tail_ms) / 1000.0),
        }
    }

    /// Host names (as reported by `cpal::HostId::name`) to try before the
    /// platform default.
    pub fn with_preferred_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for CpalHost {
    type Context = CpalContext;

    fn open_context(&self) -> Result<Self::Context, BackendError> {
        let (tx, rx) = RingBuffer::<ScheduledTone>::new(self.queue_capacity);
        let clock = Arc::new(AtomicU64::new(0));
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (finish_tx, finish_rx) = mpsc::channel();

        let session = Session {
            preferred_hosts: self.preferred_hosts.clone(),
            max_voices: self.queue_capacity,
            tail: self.tail,
            clock: Arc::clone(&clock),
        };

        thread::Builder::new()
            .name("clockly-session".into())
            .spawn(move || session.run(rx, ready_tx, finish_rx))?;

        let sample_rate = await_ready(&ready_rx, OPEN_TIMEOUT)?;

        Ok(CpalContext {
            tx,
            clock,
            sample_rate,
            last_stop: 0.0,
            finish: Some(finish_tx),
        })
    }
}

pub struct CpalContext {
    tx: Producer<ScheduledTone>,
    clock: Arc<AtomicU64>,
    sample_rate: f32,
    last_stop: f64,
    finish: Option<mpsc::Sender<f64>>,
}

impl AudioContext for CpalContext {
    fn current_time(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / f64::from(self.sample_rate)
    }

    fn schedule_tone(&mut self, tone: ScheduledTone) -> Result<(), BackendError> {
        tone.validate()?;
        self.tx.push(tone).map_err(|_| BackendError::QueueFull)?;
        self.last_stop = self.last_stop.max(tone.stop);
        Ok(())
    }
}

impl Drop for CpalContext {
    fn drop(&mut self) {
        if let Some(finish) = self.finish.take() {
            // the session thread may already be gone after a stream error
            let _ = finish.send(self.last_stop);
        }
    }
}

struct Session {
    preferred_hosts: Vec<String>,
    max_voices: usize,
    tail: Duration,
    clock: Arc<AtomicU64>,
}

impl Session {
    fn run(
        self,
        rx: Consumer<ScheduledTone>,
        ready: mpsc::SyncSender<Result<f32, BackendError>>,
        finish: mpsc::Receiver<f64>,
    ) {
        let (stream, sample_rate) = match self.open_stream(rx) {
            Ok(opened) => opened,
            Err(err) => {
                let _ = ready.send(Err(err));
                return;
            }
        };

        if ready.send(Ok(sample_rate)).is_err() {
            return;
        }

        // A dropped sender means the context went away without scheduling
        let until = finish.recv().unwrap_or(0.0);
        self.wait_until(until, sample_rate);

        drop(stream);
        debug!(until, "session closed");
    }

    fn open_stream(
        &self,
        rx: Consumer<ScheduledTone>,
    ) -> Result<(cpal::Stream, f32), BackendError> {
        let (host_id, device) = detect_output(&self.preferred_hosts)?;

        let supported = device
            .default_output_config()
            .map_err(|e| BackendError::DefaultConfig(e.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(BackendError::UnsupportedSampleFormat(
                supported.sample_format().to_string(),
            ));
        }

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;

        let mut mixer = ToneMixer::new(sample_rate, self.max_voices, rx);
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        let clock = Arc::clone(&self.clock);

        let stream = device
            .build_output_stream(
                &supported.config(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mixer.render_interleaved(data, channels, &mut scratch);
                    clock.store(mixer.frame(), Ordering::Release);
                },
                |err| warn!(%err, "output stream error"),
                None,
            )
            .map_err(|e| BackendError::BuildStream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| BackendError::PlayStream(e.to_string()))?;

        info!(host = host_id.name(), sample_rate, channels, "output stream opened");
        Ok((stream, sample_rate))
    }

    /// Block until the session clock passes `until` plus the tail, or the
    /// wall clock says the stream has stalled.
    fn wait_until(&self, until: f64, sample_rate: f32) {
        let now = self.clock.load(Ordering::Acquire) as f64 / f64::from(sample_rate);
        let deadline = Instant::now() + session_wait(until, now, self.tail) + STALL_GRACE;
        let target = until + self.tail.as_secs_f64();

        while Instant::now() < deadline {
            let frames = self.clock.load(Ordering::Acquire);
            if frames as f64 / f64::from(sample_rate) >= target {
                return;
            }
            thread::sleep(POLL_INTERVAL);
        }

        warn!(until, "session clock stalled, closing stream");
    }
}

/// Wall-clock time left in a session ending at `until` (plus `tail`),
/// capped at [`MAX_SESSION_WAIT`].
fn session_wait(until: f64, now: f64, tail: Duration) -> Duration {
    // NaN collapses to zero through max
    let remaining =
        Duration::try_from_secs_f64((until - now).max(0.0)).unwrap_or(MAX_SESSION_WAIT);
    remaining.saturating_add(tail).min(MAX_SESSION_WAIT)
}

fn await_ready(
    ready: &mpsc::Receiver<Result<f32, BackendError>>,
    timeout: Duration,
) -> Result<f32, BackendError> {
    match ready.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(BackendError::OpenTimeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(BackendError::SessionClosed),
    }
}

/// Host ids in detection order: configured names first, then the platform
/// default, then everything else cpal was compiled with.
fn candidate_hosts(preferred: &[String]) -> Vec<cpal::HostId> {
    let available = cpal::available_hosts();
    let mut ordered = Vec::with_capacity(available.len());

    for name in preferred {
        match available
            .iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
        {
            Some(id) => ordered.push(*id),
            None => debug!(host = %name, "preferred audio host not compiled in"),
        }
    }

    ordered.push(cpal::default_host().id());
    ordered.extend(available.iter().copied());

    let mut seen = Vec::with_capacity(ordered.len());
    ordered.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
    ordered
}

/// First host that offers a default output device.
fn detect_output(preferred: &[String]) -> Result<(cpal::HostId, cpal::Device), BackendError> {
    let candidates = candidate_hosts(preferred);

    for id in &candidates {
        match cpal::host_from_id(*id) {
            Ok(host) => match host.default_output_device() {
                Some(device) => return Ok((*id, device)),
                None => debug!(host = id.name(), "no default output device"),
            },
            Err(err) => debug!(host = id.name(), %err, "audio host unavailable"),
        }
    }

    let tried = candidates
        .iter()
        .map(|id| id.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(BackendError::NoOutputDevice { tried })
}
