//! Event I/O buffering between a platform source/sink pair and the
//! engine. Buffers outgoing events so a burst of synthetic events from
//! one input event is written as a batch, but never lets output sit
//! unwritten once the source has nothing more queued up.

use arrayvec::ArrayVec;
use log::trace;

use keyrx_core::{Engine, InputEvent};

use crate::error::DaemonResult;
use crate::platform::{EventSink, EventSource};

/// Write-buffer capacity. Flushing this often keeps latency low on an
/// interactive keyboard stream while still batching the occasional
/// synthetic-event burst a tap/hold commit or chord reconciliation
/// produces.
pub const MAX_EVENTS: usize = 10;

/// Drives a source/engine/sink triple until the source ends or a write
/// fails.
pub struct EventPump<S: EventSource, K: EventSink> {
    source: S,
    sink: K,
    engine: Engine,
    write_buf: ArrayVec<InputEvent, MAX_EVENTS>,
}

impl<S: EventSource, K: EventSink> EventPump<S, K> {
    pub fn new(source: S, sink: K, engine: Engine) -> Self {
        EventPump {
            source,
            sink,
            engine,
            write_buf: ArrayVec::new(),
        }
    }

    /// Consumes the pump and returns its sink, for inspecting what was
    /// written once a run has ended.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Reads events until the source is exhausted, feeding each through
    /// the engine and writing the results downstream.
    pub fn run(&mut self) -> DaemonResult<()> {
        loop {
            let event = self.source.next_event()?;
            let produced = self.engine.process_event(event);

            for out_event in produced {
                self.push(out_event)?;
            }

            if !self.source.has_more_buffered() {
                self.flush()?;
            }
        }
    }

    fn push(&mut self, event: InputEvent) -> DaemonResult<()> {
        if self.write_buf.is_full() {
            self.flush()?;
        }
        self.write_buf.push(event);
        Ok(())
    }

    /// Writes out buffered events one at a time, removing each only
    /// after a successful write. Using `drain` here would either
    /// duplicate events already written before a failing one (if drain
    /// continued) or silently discard events still queued behind it
    /// (if it didn't), neither of which is acceptable on a write error.
    fn flush(&mut self) -> DaemonResult<()> {
        while let Some(event) = self.write_buf.first().copied() {
            self.sink.write_event(event)?;
            self.write_buf.remove(0);
        }
        trace!("flushed write buffer");
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockSink, MockSource};
    use keyrx_core::event::{keycodes::KEY_A, Value};
    use keyrx_core::rules::map::MapRule;

    fn key(code: u16, value: Value) -> InputEvent {
        InputEvent::key(code, value)
    }

    #[test]
    fn passthrough_events_reach_the_sink_in_order() {
        let engine = Engine::new(&[], &[], &[]).unwrap();
        let source = MockSource::new([key(KEY_A, Value::Down), key(KEY_A, Value::Up)]);
        let sink = MockSink::default();
        let mut pump = EventPump::new(source, sink, engine);

        let err = pump.run().unwrap_err();
        assert!(matches!(err, crate::error::DaemonError::EndOfStream));
        assert_eq!(
            pump.sink.written,
            [key(KEY_A, Value::Down), key(KEY_A, Value::Up)]
        );
        assert!(pump.sink.flush_count >= 2);
    }

    #[test]
    fn dropped_events_never_reach_the_sink() {
        let map_rules = [MapRule::drop(KEY_A)];
        let engine = Engine::new(&map_rules, &[], &[]).unwrap();
        let source = MockSource::new([key(KEY_A, Value::Down)]);
        let sink = MockSink::default();
        let mut pump = EventPump::new(source, sink, engine);

        let _ = pump.run().unwrap_err();
        assert!(pump.sink.written.is_empty());
    }
}
