//! Key-state shadow: the last observed value of every key code, plus the
//! modifier-sibling table used to treat LEFT/RIGHT pairs as equivalent.

use crate::event::keycodes::{
    KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA, KEY_LEFTSHIFT, KEY_RIGHTALT, KEY_RIGHTCTRL,
    KEY_RIGHTMETA, KEY_RIGHTSHIFT,
};

/// Upper bound on key codes the shadow tracks. Linux's `KEY_MAX` is
/// 0x2ff; codes at or above this are tracked as always-up, which only
/// matters for out-of-range garbage a misbehaving source might send.
pub const KEY_MAX: usize = 768;

/// Last-observed-value-per-keycode table, updated once per key event the
/// engine decides to write downstream.
pub struct KeyStateShadow {
    state: Box<[i32; KEY_MAX]>,
}

impl Default for KeyStateShadow {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStateShadow {
    pub fn new() -> Self {
        KeyStateShadow {
            state: Box::new([0; KEY_MAX]),
        }
    }

    /// Record the value just written for `code`.
    pub fn record(&mut self, code: u16, value: i32) {
        if let Some(slot) = self.state.get_mut(code as usize) {
            *slot = value;
        }
    }

    fn value_of(&self, code: u16) -> i32 {
        self.state.get(code as usize).copied().unwrap_or(0)
    }

    /// Is `code` currently down, by itself (ignoring its modifier sibling)?
    pub fn is_down(&self, code: u16) -> bool {
        self.value_of(code) != 0
    }

    /// Is `code` currently down, treating its LEFT/RIGHT modifier sibling
    /// (if any) as equivalent?
    pub fn is_down_mirrored(&self, code: u16) -> bool {
        self.is_down(code) || self.is_down(mirror(code))
    }
}

/// Maps a LEFT/RIGHT modifier to its sibling; any other code maps to
/// itself. Grounded on the historical `key_ismod()` helper, which only
/// recognized these four pairs.
pub const fn mirror(code: u16) -> u16 {
    match code {
        KEY_LEFTSHIFT => KEY_RIGHTSHIFT,
        KEY_RIGHTSHIFT => KEY_LEFTSHIFT,
        KEY_LEFTCTRL => KEY_RIGHTCTRL,
        KEY_RIGHTCTRL => KEY_LEFTCTRL,
        KEY_LEFTALT => KEY_RIGHTALT,
        KEY_RIGHTALT => KEY_LEFTALT,
        KEY_LEFTMETA => KEY_RIGHTMETA,
        KEY_RIGHTMETA => KEY_LEFTMETA,
        other => other,
    }
}

/// Is `code` one of the eight modifier keys recognized by [`mirror`]?
pub const fn is_modifier(code: u16) -> bool {
    matches!(
        code,
        KEY_LEFTSHIFT
            | KEY_RIGHTSHIFT
            | KEY_LEFTCTRL
            | KEY_RIGHTCTRL
            | KEY_LEFTALT
            | KEY_RIGHTALT
            | KEY_LEFTMETA
            | KEY_RIGHTMETA
    )
}
