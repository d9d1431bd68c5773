use criterion::{criterion_group, criterion_main, Criterion};
use keyrx_core::event::keycodes::{KEY_A, KEY_CAPSLOCK, KEY_ESC, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_RIGHTSHIFT, KEY_X};
use keyrx_core::event::{InputEvent, Value};
use keyrx_core::{Engine, MapRule, MultiKeyRule, TapHoldRule};

fn build_engine() -> Engine {
    let map_rules = [MapRule::new(KEY_CAPSLOCK, KEY_ESC)];
    let tap_hold_rules = [TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL)];
    let multi_key_rules = [MultiKeyRule::down_iff_all_down(
        &[KEY_LEFTSHIFT, KEY_RIGHTSHIFT],
        [KEY_CAPSLOCK, keyrx_core::event::KEY_RESERVED],
        [keyrx_core::event::KEY_RESERVED, KEY_CAPSLOCK],
    )];
    Engine::new(&map_rules, &tap_hold_rules, &multi_key_rules).expect("valid rule tables")
}

fn bench_tap_hold_cycle(c: &mut Criterion) {
    c.bench_function("tap_hold_commit_cycle", |b| {
        b.iter(|| {
            let mut engine = build_engine();
            engine.process_event(InputEvent::key(KEY_A, Value::Down));
            engine.process_event(InputEvent::key(KEY_X, Value::Down));
            engine.process_event(InputEvent::key(KEY_X, Value::Up));
            engine.process_event(InputEvent::key(KEY_A, Value::Up));
        })
    });
}

fn bench_passthrough(c: &mut Criterion) {
    let mut engine = build_engine();
    c.bench_function("passthrough_event", |b| {
        b.iter(|| engine.process_event(InputEvent::key(KEY_ESC, Value::Down)))
    });
}

criterion_group!(benches, bench_tap_hold_cycle, bench_passthrough);
criterion_main!(benches);
