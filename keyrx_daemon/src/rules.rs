//! Baked-in rule tables. Swapping in a different keyboard layout means
//! editing these three functions and rebuilding - there is no runtime
//! configuration file format.

use keyrx_core::event::keycodes::{
    KEY_A, KEY_CAPSLOCK, KEY_ESC, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_RIGHTSHIFT, KEY_X,
};
use keyrx_core::event::KEY_RESERVED;
use keyrx_core::rules::map::MapRule;
use keyrx_core::rules::multi_key::MultiKeyRule;
use keyrx_core::rules::tap_hold::TapHoldRule;

/// Plain substitutions, evaluated first-match-wins.
pub const fn map_rules() -> &'static [MapRule] {
    &[MapRule::new(KEY_CAPSLOCK, KEY_ESC)]
}

/// Tap/hold rules, evaluated independently of each other after the map
/// stage.
pub const fn tap_hold_rules() -> &'static [TapHoldRule] {
    &[
        // A taps as A, holds as Left Ctrl.
        TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL),
        // X taps as X, holds as Left Alt, but falls back to a plain
        // repeating X if held long enough that it looks like the user
        // just wants a fast repeat instead of the modifier.
        TapHoldRule::simple(KEY_X, KEY_X, KEY_LEFTALT).with_repeat(KEY_X, 2),
    ]
}

/// Multi-key (chord toggle) rules, evaluated last.
pub const fn multi_key_rules() -> &'static [MultiKeyRule] {
    &[
        // Both shifts together toggle Caps Lock instead of typing
        // anything, and release cleanly without leaving either shift
        // stuck down.
        MultiKeyRule::chord(
            [
                KEY_LEFTSHIFT,
                KEY_RIGHTSHIFT,
                KEY_RESERVED,
                KEY_RESERVED,
                KEY_RESERVED,
                KEY_RESERVED,
                KEY_RESERVED,
                KEY_RESERVED,
            ],
            [KEY_CAPSLOCK, KEY_RESERVED],
            [KEY_RESERVED, KEY_CAPSLOCK],
            0,
            -2,
            0,
        ),
    ]
}
