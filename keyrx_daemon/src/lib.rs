//! Binary-side glue: event I/O buffering, the baked-in rule tables, the
//! Linux platform adapter, and the daemon's error type. `keyrx_core`
//! does all the actual remapping; this crate only gets bytes in and
//! out.

pub mod error;
pub mod io;
pub mod platform;
pub mod rules;
pub mod run;

pub use error::{DaemonError, DaemonResult};
