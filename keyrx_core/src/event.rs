//! The raw input-event record and the kernel constants the engine
//! dispatches on.
//!
//! The field layout mirrors `struct input_event` from `linux/input.h`:
//! a timestamp, a 16-bit type, a 16-bit code and a 32-bit signed value.
//! Nothing here depends on evdev or any other crate - the daemon is
//! responsible for translating between this record and whatever the
//! platform adapter's library uses on the wire.

/// `EV_KEY` - a keyboard/button state change.
pub const EV_KEY: u16 = 0x01;
/// `EV_MSC` - miscellaneous; paired with [`MSC_SCAN`] this reports the raw
/// scan code alongside a key event and carries no remapping meaning.
pub const EV_MSC: u16 = 0x04;
/// `MSC_SCAN` - the code used for `EV_MSC` scan-code-echo events.
pub const MSC_SCAN: u16 = 0x04;

/// The reserved/null key code. Used as the "no key" sentinel in rule
/// tables (a map rule that targets it drops the event; a tap/hold or
/// multi-key slot holding it is simply unused).
pub const KEY_RESERVED: u16 = 0;

/// A sample of `KEY_*` codes used by the example rule tables and tests.
/// Not exhaustive - any `u16` is a valid key code as far as the engine
/// is concerned.
pub mod keycodes {
    pub const KEY_ESC: u16 = 1;
    pub const KEY_A: u16 = 30;
    pub const KEY_X: u16 = 45;
    pub const KEY_CAPSLOCK: u16 = 58;
    pub const KEY_LEFTCTRL: u16 = 29;
    pub const KEY_LEFTSHIFT: u16 = 42;
    pub const KEY_RIGHTSHIFT: u16 = 54;
    pub const KEY_LEFTALT: u16 = 56;
    pub const KEY_RIGHTCTRL: u16 = 97;
    pub const KEY_RIGHTALT: u16 = 100;
    pub const KEY_LEFTMETA: u16 = 125;
    pub const KEY_RIGHTMETA: u16 = 126;
}

/// The three meanings an `EV_KEY` event's `value` can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Up = 0,
    Down = 1,
    Repeat = 2,
}

impl TryFrom<i32> for Value {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Value::Up),
            1 => Ok(Value::Down),
            2 => Ok(Value::Repeat),
            _ => Err(()),
        }
    }
}

impl From<Value> for i32 {
    fn from(value: Value) -> Self {
        value as i32
    }
}

/// One kernel input event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub seconds: i64,
    pub microseconds: i64,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Build a synthetic `EV_KEY` event. Synthetic events carry a zero
    /// timestamp; only the engine's relative ordering of emissions
    /// matters, not wall-clock placement.
    pub fn key(code: u16, value: Value) -> Self {
        InputEvent {
            seconds: 0,
            microseconds: 0,
            kind: EV_KEY,
            code,
            value: value.into(),
        }
    }

    pub fn is_key(&self) -> bool {
        self.kind == EV_KEY
    }

    pub fn is_misc_scan(&self) -> bool {
        self.kind == EV_MSC && self.code == MSC_SCAN
    }

    pub fn key_value(&self) -> Option<Value> {
        if self.is_key() {
            Value::try_from(self.value).ok()
        } else {
            None
        }
    }
}
