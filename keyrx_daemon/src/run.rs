//! Wires a source/sink pair together with the engine and drives it to
//! completion.

use keyrx_core::Engine;

use crate::io::EventPump;
use crate::platform::{EventSink, EventSource};
use crate::DaemonResult;

pub fn run<S: EventSource, K: EventSink>(source: S, sink: K, engine: Engine) -> DaemonResult<()> {
    EventPump::new(source, sink, engine).run()
}
