pub mod backend; // Audio hosts and playback sessions
pub mod catalog; // Sound definitions and display categories
pub mod config;
pub mod dsp;
pub mod sequencer; // Name lookup and segment scheduling
pub mod synth; // Voice pool that renders scheduled tones

pub use backend::{AudioContext, AudioHost, BackendError, ScheduledTone};
pub use catalog::{Catalog, CatalogError, Segment, SegmentError, SoundDefinition};
pub use config::{AppConfig, ConfigError};
pub use sequencer::{schedule_segments, SequenceError, SessionSpan, ToneSequencer, ToneShape};

pub const MAX_BLOCK_SIZE: usize = 2048;
