//! Process-level error type. Per the error handling policy: interrupted
//! syscalls retry transparently inside the platform adapter and never
//! surface here; everything that does surface is fatal and maps to a
//! nonzero exit status in `main`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("event source reached end of stream")]
    EndOfStream,

    #[error("rule table validation failed: {0}")]
    InvalidRules(#[from] keyrx_core::EngineError),
}

pub type DaemonResult<T> = Result<T, DaemonError>;
