//! `EventSource`/`EventSink` - the seam between the engine and whatever
//! actually reads/writes kernel input events. Production code uses
//! [`linux::EvdevSource`]/[`linux::UinputSink`]; tests use [`mock`].

use keyrx_core::InputEvent;

use crate::error::DaemonResult;

pub mod mock;

#[cfg(feature = "linux")]
pub mod linux;

/// A source of raw input events.
pub trait EventSource {
    /// Returns the next event, blocking if necessary. Returns
    /// `Err(DaemonError::EndOfStream)` once the underlying device or
    /// fixture is exhausted - always fatal, per the error handling
    /// policy.
    fn next_event(&mut self) -> DaemonResult<InputEvent>;

    /// Whether the source still has events buffered and ready without
    /// blocking. The I/O layer forces a write-buffer flush whenever
    /// this returns `false`, so output doesn't linger once input goes
    /// quiet. Sources with no internal batching can just return `false`.
    fn has_more_buffered(&self) -> bool {
        false
    }
}

/// A sink that writes transformed input events downstream.
pub trait EventSink {
    fn write_event(&mut self, event: InputEvent) -> DaemonResult<()>;

    /// Commits any buffered writes (e.g. a `SYN_REPORT` on a uinput
    /// device) so the consumer sees a complete, synchronized batch.
    fn flush(&mut self) -> DaemonResult<()>;
}
