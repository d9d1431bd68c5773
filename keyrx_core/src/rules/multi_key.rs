//! The multi-key stage: a chord of up to 8 watched keys that toggles a
//! pair of "press on engage" / "press on disengage" actions, with gate
//! predicates controlling when it is allowed to (re-)fire.

use crate::event::{InputEvent, Value, KEY_RESERVED};
use crate::MAX_SYNTH_EVENTS;
use arrayvec::ArrayVec;

/// Upper bound on keys a single multi-key rule can watch.
pub const MAX_WATCHED_KEYS: usize = 8;

/// Static configuration for one multi-key (chord toggle) rule.
#[derive(Debug, Clone, Copy)]
pub struct MultiKeyRule {
    /// Watched keys, padded with `KEY_RESERVED` after the last real one.
    pub keys: [u16; MAX_WATCHED_KEYS],
    /// `[press, release]` emitted when the chord engages (`is_down`
    /// becomes true). Either slot may be `KEY_RESERVED` to skip it.
    pub down_press: [u16; 2],
    /// `[press, release]` emitted when the chord disengages.
    pub up_press: [u16; 2],
    /// Re-arm gate while disengaged: `n >= 0` requires `ndown == n`;
    /// `n < 0` requires `ndown != -n`.
    pub nbeforedown: i32,
    /// Re-arm gate while engaged, same encoding as `nbeforedown`.
    pub nbeforeup: i32,
    /// Disengage-fire gate, same encoding as `nbeforedown`.
    pub nup: i32,
}

impl MultiKeyRule {
    /// Raw, fully explicit constructor usable in a `const` rule table -
    /// every field spelled out, including the already-padded key array.
    pub const fn chord(
        keys: [u16; MAX_WATCHED_KEYS],
        down_press: [u16; 2],
        up_press: [u16; 2],
        nbeforedown: i32,
        nbeforeup: i32,
        nup: i32,
    ) -> Self {
        MultiKeyRule {
            keys,
            down_press,
            up_press,
            nbeforedown,
            nbeforeup,
            nup,
        }
    }

    /// `ntotal` keys must all be down to engage, all released to
    /// disengage - the common "hold these N together to toggle" shape.
    pub fn down_iff_all_down(keys: &[u16], down_press: [u16; 2], up_press: [u16; 2]) -> Self {
        let ntotal = keys.len() as i32;
        let mut padded = [KEY_RESERVED; MAX_WATCHED_KEYS];
        for (slot, &key) in padded.iter_mut().zip(keys.iter()) {
            *slot = key;
        }
        MultiKeyRule {
            keys: padded,
            down_press,
            up_press,
            nbeforedown: 0,
            nbeforeup: -ntotal,
            nup: 0,
        }
    }

    fn ntotal(&self) -> i32 {
        self.keys.iter().take_while(|&&k| k != KEY_RESERVED).count() as i32
    }
}

/// Per-rule runtime state.
#[derive(Debug, Clone, Copy)]
pub struct MultiKeyState {
    /// Bitmap, bit `j` set iff `keys[j]` is currently down.
    keys_down: u8,
    /// Whether the chord is currently engaged.
    pub is_down: bool,
    /// Whether the rule is currently allowed to fire a transition.
    /// Starts `true`: with every watched key up, any reasonable
    /// re-arm gate is already satisfied.
    pub can_toggle: bool,
    repeated_key: u16,
    repeating_key: u16,
    repeated_key_repeated: bool,
}

impl Default for MultiKeyState {
    fn default() -> Self {
        MultiKeyState {
            keys_down: 0,
            is_down: false,
            can_toggle: true,
            repeated_key: KEY_RESERVED,
            repeating_key: KEY_RESERVED,
            repeated_key_repeated: false,
        }
    }
}

fn gate(n: i32, ndown: i32) -> bool {
    if n >= 0 {
        ndown == n
    } else {
        ndown != -n
    }
}

fn update_repeat_tracking(state: &mut MultiKeyState, code: u16) {
    if state.repeated_key == KEY_RESERVED {
        state.repeated_key = code;
        state.repeated_key_repeated = true;
        state.repeating_key = KEY_RESERVED;
    } else if state.repeated_key == code {
        state.repeated_key_repeated = true;
        state.repeating_key = KEY_RESERVED;
    } else if state.repeating_key == code {
        if !state.repeated_key_repeated {
            state.repeated_key = code;
        }
        state.repeating_key = KEY_RESERVED;
        state.repeated_key_repeated = false;
    } else {
        state.repeating_key = code;
        state.repeated_key_repeated = false;
    }
}

fn emit_transition(
    rule: &MultiKeyRule,
    state: &MultiKeyState,
    ntotal: i32,
    out: &mut ArrayVec<InputEvent, MAX_SYNTH_EVENTS>,
) {
    let is_down = state.is_down;
    let mut pair = if is_down { rule.down_press } else { rule.up_press };

    if !is_down {
        if pair[0] != KEY_RESERVED {
            out.push(InputEvent::key(pair[0], Value::Down));
        }
        if pair[1] != KEY_RESERVED {
            out.push(InputEvent::key(pair[1], Value::Up));
        }
    }

    let opposite = usize::from(!is_down);
    for j in 0..ntotal as usize {
        if state.keys_down & (1 << j) != 0 {
            let key = rule.keys[j];
            if pair[opposite] == key {
                pair[opposite] = KEY_RESERVED;
                continue;
            }
            let value = if is_down { Value::Up } else { Value::Down };
            out.push(InputEvent::key(key, value));
        }
    }

    if is_down {
        if pair[0] != KEY_RESERVED {
            out.push(InputEvent::key(pair[0], Value::Down));
        }
        if pair[1] != KEY_RESERVED {
            out.push(InputEvent::key(pair[1], Value::Up));
        }
    }
}

/// Process one input event against a single multi-key rule.
///
/// `code` is passed by mutable reference: the repeat-pass-through case
/// (step 6) rewrites it to the currently-promoted watched key and asks
/// the engine to stop evaluating further multi-key rules for this event
/// by returning `true`.
pub fn process(
    rule: &MultiKeyRule,
    state: &mut MultiKeyState,
    code: &mut u16,
    value: Value,
    ignore: &mut bool,
    out: &mut ArrayVec<InputEvent, MAX_SYNTH_EVENTS>,
) -> bool {
    let ntotal = rule.ntotal();
    let position = rule.keys[..ntotal as usize]
        .iter()
        .position(|&k| k == *code);
    let Some(j) = position else {
        return false;
    };

    match value {
        Value::Up => state.keys_down &= !(1 << j),
        Value::Down | Value::Repeat => state.keys_down |= 1 << j,
    }

    if value == Value::Repeat {
        update_repeat_tracking(state, *code);
    }

    let ndown = state.keys_down.count_ones() as i32;

    if !state.can_toggle {
        let n = if state.is_down {
            rule.nbeforeup
        } else {
            rule.nbeforedown
        };
        state.can_toggle = gate(n, ndown);
    }

    let fire = state.can_toggle
        && if !state.is_down {
            ndown == ntotal
        } else {
            gate(rule.nup, ndown)
        };

    if fire {
        state.is_down = !state.is_down;
        let n = if state.is_down {
            rule.nbeforeup
        } else {
            rule.nbeforedown
        };
        state.can_toggle = gate(n, ndown);
        emit_transition(rule, state, ntotal, out);
        *ignore = true;
        return false;
    }

    if state.is_down && *code == state.repeated_key {
        let is_press_release_pair =
            rule.down_press[1] == KEY_RESERVED && rule.up_press[0] == KEY_RESERVED;
        if is_press_release_pair && rule.down_press[0] == rule.up_press[1] {
            *code = rule.down_press[0];
            return true;
        }
    }

    if state.is_down && position.is_some() {
        *ignore = true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::keycodes::{KEY_CAPSLOCK, KEY_LEFTSHIFT, KEY_RIGHTSHIFT};

    fn both_shifts_toggle_capslock() -> MultiKeyRule {
        MultiKeyRule::down_iff_all_down(
            &[KEY_LEFTSHIFT, KEY_RIGHTSHIFT],
            [KEY_CAPSLOCK, KEY_RESERVED],
            [KEY_RESERVED, KEY_CAPSLOCK],
        )
    }

    fn step(
        rule: &MultiKeyRule,
        state: &mut MultiKeyState,
        code: u16,
        value: Value,
    ) -> (bool, ArrayVec<InputEvent, MAX_SYNTH_EVENTS>) {
        let mut ignore = false;
        let mut out = ArrayVec::new();
        let mut code = code;
        process(rule, state, &mut code, value, &mut ignore, &mut out);
        (ignore, out)
    }

    #[test]
    fn both_down_engages_and_reconciles_shifts() {
        let rule = both_shifts_toggle_capslock();
        let mut state = MultiKeyState {
            can_toggle: true,
            ..Default::default()
        };

        let (ignore, out) = step(&rule, &mut state, KEY_LEFTSHIFT, Value::Down);
        assert!(!ignore);
        assert!(out.is_empty());

        let (ignore, out) = step(&rule, &mut state, KEY_RIGHTSHIFT, Value::Down);
        assert!(ignore);
        assert_eq!(
            out.as_slice(),
            [
                InputEvent::key(KEY_LEFTSHIFT, Value::Up),
                InputEvent::key(KEY_RIGHTSHIFT, Value::Up),
                InputEvent::key(KEY_CAPSLOCK, Value::Down),
            ]
        );
        assert!(state.is_down);
    }

    #[test]
    fn releasing_both_disengages() {
        let rule = both_shifts_toggle_capslock();
        let mut state = MultiKeyState {
            can_toggle: true,
            ..Default::default()
        };
        step(&rule, &mut state, KEY_LEFTSHIFT, Value::Down);
        step(&rule, &mut state, KEY_RIGHTSHIFT, Value::Down);

        let (ignore, out) = step(&rule, &mut state, KEY_RIGHTSHIFT, Value::Up);
        assert!(ignore);
        assert!(out.is_empty());
        assert!(state.is_down);

        let (_, out) = step(&rule, &mut state, KEY_LEFTSHIFT, Value::Up);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_CAPSLOCK, Value::Up)]);
        assert!(!state.is_down);
    }

    #[test]
    fn unrelated_key_passes_through() {
        let rule = both_shifts_toggle_capslock();
        let mut state = MultiKeyState::default();
        let (ignore, out) = step(&rule, &mut state, KEY_CAPSLOCK, Value::Down);
        assert!(!ignore);
        assert!(out.is_empty());
    }
}
