use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::backend::ScheduledTone;

/// Source of newly scheduled tones, drained once per rendered block.
pub trait ToneReceiver {
    fn pop(&mut self) -> Option<ScheduledTone>;
}

#[cfg(feature = "rtrb")]
impl ToneReceiver for Consumer<ScheduledTone> {
    fn pop(&mut self) -> Option<ScheduledTone> {
        Consumer::pop(self).ok()
    }
}

/// Offline rendering and tests feed the mixer from a plain queue.
impl ToneReceiver for VecDeque<ScheduledTone> {
    fn pop(&mut self) -> Option<ScheduledTone> {
        self.pop_front()
    }
}
