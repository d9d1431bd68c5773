//! In-memory `EventSource`/`EventSink` pair for daemon-level tests.

use std::collections::VecDeque;

use keyrx_core::InputEvent;

use crate::error::{DaemonError, DaemonResult};
use crate::platform::{EventSink, EventSource};

/// Replays a fixed sequence of events, then reports end of stream.
pub struct MockSource {
    events: VecDeque<InputEvent>,
}

impl MockSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        MockSource {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for MockSource {
    fn next_event(&mut self) -> DaemonResult<InputEvent> {
        self.events.pop_front().ok_or(DaemonError::EndOfStream)
    }

    fn has_more_buffered(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Records every event written to it, in order, plus how many times
/// `flush` was called.
#[derive(Default)]
pub struct MockSink {
    pub written: Vec<InputEvent>,
    pub flush_count: usize,
}

impl EventSink for MockSink {
    fn write_event(&mut self, event: InputEvent) -> DaemonResult<()> {
        self.written.push(event);
        Ok(())
    }

    fn flush(&mut self) -> DaemonResult<()> {
        self.flush_count += 1;
        Ok(())
    }
}
