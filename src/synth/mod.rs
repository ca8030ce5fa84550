// Purpose: turn scheduled tones into samples
// Voices render one tone each; the mixer owns the voice pool and the clock

pub mod message;
pub mod mixer;
pub mod voice;

pub use message::ToneReceiver;
pub use mixer::ToneMixer;
pub use voice::{ToneVoice, VoiceState};
