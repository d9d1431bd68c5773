//! Entry point: build the engine from the baked-in rule tables, open
//! the platform adapter, and run until the source ends.
//!
//! Takes no command-line arguments - which device to grab and what to
//! name the virtual keyboard are compiled in (see `platform::linux`)
//! rather than configured at runtime.

use std::process::ExitCode;

use log::error;

use keyrx_daemon::{rules, DaemonError};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(feature = "linux")]
fn main() -> ExitCode {
    init_logging();

    let engine = match keyrx_core::Engine::new(
        rules::map_rules(),
        rules::tap_hold_rules(),
        rules::multi_key_rules(),
    ) {
        Ok(engine) => engine,
        Err(err) => {
            error!("rule table validation failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let source = match keyrx_daemon::platform::linux::EvdevSource::open(
        "/dev/input/by-id/keyrx-source",
        true,
    ) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to open input source: {err}");
            return ExitCode::FAILURE;
        }
    };

    let sink = match keyrx_daemon::platform::linux::UinputSink::create("keyrx virtual keyboard") {
        Ok(sink) => sink,
        Err(err) => {
            error!("failed to create uinput sink: {err}");
            return ExitCode::FAILURE;
        }
    };

    match keyrx_daemon::run::run(source, sink, engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DaemonError::EndOfStream) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "linux"))]
fn main() -> ExitCode {
    init_logging();
    error!("built without the \"linux\" feature: no platform adapter available");
    ExitCode::FAILURE
}
