//! End-to-end runs through `EventPump` using the mock source/sink,
//! exercising the baked-in rule tables as a whole rather than any one
//! stage in isolation.

use keyrx_core::event::keycodes::{
    KEY_A, KEY_CAPSLOCK, KEY_ESC, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_RIGHTSHIFT, KEY_X,
};
use keyrx_core::event::Value;
use keyrx_core::{Engine, InputEvent};

use keyrx_daemon::io::EventPump;
use keyrx_daemon::platform::mock::{MockSink, MockSource};
use keyrx_daemon::rules;

fn key(code: u16, value: Value) -> InputEvent {
    InputEvent::key(code, value)
}

fn run_through_pump(events: impl IntoIterator<Item = InputEvent>) -> Vec<InputEvent> {
    let engine = Engine::new(
        rules::map_rules(),
        rules::tap_hold_rules(),
        rules::multi_key_rules(),
    )
    .unwrap();
    let source = MockSource::new(events);
    let sink = MockSink::default();
    let mut pump = EventPump::new(source, sink, engine);
    let _ = pump.run();
    pump.into_sink().written
}

#[test]
fn capslock_maps_to_escape_end_to_end() {
    let out = run_through_pump([key(KEY_CAPSLOCK, Value::Down), key(KEY_CAPSLOCK, Value::Up)]);
    assert_eq!(out, [key(KEY_ESC, Value::Down), key(KEY_ESC, Value::Up)]);
}

#[test]
fn a_resolves_to_clean_tap_end_to_end() {
    let out = run_through_pump([key(KEY_A, Value::Down), key(KEY_A, Value::Up)]);
    assert_eq!(out, [key(KEY_A, Value::Down), key(KEY_A, Value::Up)]);
}

#[test]
fn a_resolves_to_held_ctrl_end_to_end() {
    let out = run_through_pump([
        key(KEY_A, Value::Down),
        key(KEY_X, Value::Down),
        key(KEY_X, Value::Up),
        key(KEY_A, Value::Up),
    ]);
    assert_eq!(
        out,
        [
            key(KEY_LEFTCTRL, Value::Down),
            key(KEY_X, Value::Down),
            key(KEY_X, Value::Up),
            key(KEY_LEFTCTRL, Value::Up),
        ]
    );
}

#[test]
fn both_shifts_toggle_capslock_end_to_end() {
    let out = run_through_pump([
        key(KEY_LEFTSHIFT, Value::Down),
        key(KEY_RIGHTSHIFT, Value::Down),
        key(KEY_RIGHTSHIFT, Value::Up),
        key(KEY_LEFTSHIFT, Value::Up),
    ]);
    assert_eq!(
        out,
        [
            key(KEY_LEFTSHIFT, Value::Up),
            key(KEY_RIGHTSHIFT, Value::Up),
            key(KEY_CAPSLOCK, Value::Down),
            key(KEY_CAPSLOCK, Value::Up),
        ]
    );
}

#[test]
fn write_buffer_flushes_once_source_runs_dry() {
    let engine = Engine::new(&[], &[], &[]).unwrap();
    let events: Vec<_> = (0..3)
        .map(|i| key(100 + i, Value::Down))
        .collect();
    let source = MockSource::new(events.clone());
    let sink = MockSink::default();
    let mut pump = EventPump::new(source, sink, engine);
    let _ = pump.run();

    let sink = pump.into_sink();
    assert_eq!(sink.written, events);
    assert!(sink.flush_count >= events.len());
}
