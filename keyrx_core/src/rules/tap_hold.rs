//! The tap/hold stage: turns a single physical key into either a quick
//! tap (one code) or a held action (another code), optionally with a
//! repeat-delay fallback and a typing-burst override.

use crate::event::{InputEvent, Value, KEY_RESERVED};
use crate::shadow::KeyStateShadow;
use crate::MAX_SYNTH_EVENTS;
use arrayvec::ArrayVec;

/// Static configuration for one tap/hold rule.
#[derive(Debug, Clone, Copy)]
pub struct TapHoldRule {
    /// The physical key this rule watches.
    pub base_key: u16,
    /// Emitted when `base_key` resolves to a clean tap.
    pub tap_key: u16,
    /// Emitted when `base_key` resolves to a hold.
    pub hold_key: u16,
    /// Emitted instead of `hold_key` once `repeat_delay` repeats have
    /// elapsed while armed. `KEY_RESERVED` disables the repeat fallback.
    pub repeat_key: u16,
    /// Number of `base_key` repeats to absorb before committing to
    /// `repeat_key`.
    pub repeat_delay: u32,
    /// Whether a modifier key counts as an "other key" for hold
    /// resolution when `action_key` is scoped.
    pub tap_mods: bool,
    /// If set, only this key (subject to `tap_mods`) triggers the hold
    /// while armed; other keys pass through unaffected. `KEY_RESERVED`
    /// means any key triggers the hold.
    pub action_key: u16,
    /// Emit `hold_key` down as soon as the rule arms, instead of
    /// waiting for resolution.
    pub hold_immediately: bool,
    /// While a typing burst looks active, resolve armed+other-key-down
    /// as a late tap instead of a hold.
    pub tap_typing: bool,
}

impl TapHoldRule {
    /// A tap/hold rule with no repeat fallback, no action-key scoping,
    /// no `hold_immediately`, and no typing override - the common case.
    pub const fn simple(base_key: u16, tap_key: u16, hold_key: u16) -> Self {
        TapHoldRule {
            base_key,
            tap_key,
            hold_key,
            repeat_key: KEY_RESERVED,
            repeat_delay: 0,
            tap_mods: false,
            action_key: KEY_RESERVED,
            hold_immediately: false,
            tap_typing: false,
        }
    }

    pub const fn with_repeat(mut self, repeat_key: u16, repeat_delay: u32) -> Self {
        self.repeat_key = repeat_key;
        self.repeat_delay = repeat_delay;
        self
    }

    pub const fn with_action_key(mut self, action_key: u16, tap_mods: bool) -> Self {
        self.action_key = action_key;
        self.tap_mods = tap_mods;
        self
    }

    pub const fn hold_immediately(mut self) -> Self {
        self.hold_immediately = true;
        self
    }

    pub const fn tap_while_typing(mut self) -> Self {
        self.tap_typing = true;
        self
    }
}

/// The resolved identity of whatever `base_key` is currently "acting
/// as", modeled as a proper tagged enum instead of the historical
/// `RESERVED`/`-1`/concrete-key sentinel trio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActKey {
    /// `base_key` is up; the rule has nothing in flight.
    Idle,
    /// `base_key` is down and resolution hasn't happened yet.
    Armed,
    /// Resolved: `base_key` is currently acting as this key.
    Acting(u16),
}

/// Per-rule runtime state.
#[derive(Debug, Clone, Copy)]
pub struct TapHoldState {
    pub act_key: ActKey,
    pub curr_delay: u32,
    /// Sticky flag: set on every rule sharing this rule's
    /// `(base_key, tap_key)` pair the moment any of them commits to a
    /// hold, so a later clean-tap check on a sibling rule correctly
    /// sees that the chord already resolved to a hold this cycle.
    pub was_held: bool,
}

impl Default for TapHoldState {
    fn default() -> Self {
        TapHoldState {
            act_key: ActKey::Idle,
            curr_delay: 0,
            was_held: false,
        }
    }
}

/// Process one input event against a single tap/hold rule.
///
/// `code` and `value` are the event as it arrives at this stage (after
/// the map stage, before the multi-key stage). Synthetic events this
/// rule wants emitted are appended, in order, to `out`. `*ignore` is
/// OR'd with whether this rule wants the original event suppressed.
/// Returns `Some((base_key, tap_key))` when this call just committed a
/// hold, so the engine can propagate `was_held` to sibling rules
/// sharing the same pair.
///
/// On a fresh `base_key` down, if a typing burst looks active (when
/// `tap_typing` is set) or `hold_key` is already held (including its
/// modifier sibling) per `shadow`, the rule resolves immediately to a
/// tap instead of arming - holding `hold_key` down while tapping
/// `base_key` should never add a second, redundant press of `hold_key`.
pub fn process(
    rule: &TapHoldRule,
    state: &mut TapHoldState,
    code: u16,
    value: Value,
    shadow: &KeyStateShadow,
    typing_active: bool,
    ignore: &mut bool,
    out: &mut ArrayVec<InputEvent, MAX_SYNTH_EVENTS>,
) -> Option<(u16, u16)> {
    if code == rule.base_key {
        process_base_key(rule, state, value, shadow, typing_active, ignore, out);
        return None;
    }

    if state.act_key == ActKey::Idle {
        return None;
    }

    if state.act_key != ActKey::Armed || value != Value::Down {
        return None;
    }

    let scoped_match = rule.action_key == KEY_RESERVED
        || (code == rule.action_key
            && !(crate::shadow::is_modifier(code) && !rule.tap_mods));
    if !scoped_match {
        return None;
    }

    if rule.tap_typing && typing_active && !state.was_held {
        out.push(InputEvent::key(rule.tap_key, Value::Down));
        state.act_key = ActKey::Acting(rule.tap_key);
        if rule.action_key != KEY_RESERVED {
            *ignore = true;
        }
        return None;
    }

    state.act_key = ActKey::Acting(rule.hold_key);
    if !rule.hold_immediately {
        out.push(InputEvent::key(rule.hold_key, Value::Down));
    }
    if rule.action_key != KEY_RESERVED {
        *ignore = true;
    }
    Some((rule.base_key, rule.tap_key))
}

fn process_base_key(
    rule: &TapHoldRule,
    state: &mut TapHoldState,
    value: Value,
    shadow: &KeyStateShadow,
    typing_active: bool,
    ignore: &mut bool,
    out: &mut ArrayVec<InputEvent, MAX_SYNTH_EVENTS>,
) {
    match value {
        Value::Down => {
            if state.act_key == ActKey::Idle {
                state.was_held = false;
                let immediate_tap = (rule.tap_typing && typing_active)
                    || shadow.is_down_mirrored(rule.hold_key);
                if immediate_tap {
                    out.push(InputEvent::key(rule.tap_key, Value::Down));
                    state.act_key = ActKey::Acting(rule.tap_key);
                } else {
                    state.act_key = ActKey::Armed;
                    state.curr_delay = rule.repeat_delay;
                    if rule.hold_immediately {
                        out.push(InputEvent::key(rule.hold_key, Value::Down));
                    }
                }
            }
            *ignore = true;
        }
        Value::Repeat => {
            if state.act_key == ActKey::Armed {
                if rule.repeat_key == KEY_RESERVED {
                    // no repeat fallback configured; stay armed and silent.
                } else if state.curr_delay > 0 {
                    state.curr_delay -= 1;
                } else {
                    if rule.hold_immediately {
                        out.push(InputEvent::key(rule.hold_key, Value::Up));
                    }
                    state.act_key = ActKey::Acting(rule.repeat_key);
                    out.push(InputEvent::key(rule.repeat_key, Value::Down));
                }
            }
            if let ActKey::Acting(acting) = state.act_key {
                out.push(InputEvent::key(acting, Value::Repeat));
            }
            *ignore = true;
        }
        Value::Up => {
            if state.act_key == ActKey::Idle {
                return;
            }
            if state.act_key == ActKey::Armed && !state.was_held {
                if rule.hold_immediately {
                    out.push(InputEvent::key(rule.hold_key, Value::Up));
                }
                state.act_key = ActKey::Acting(rule.tap_key);
                out.push(InputEvent::key(rule.tap_key, Value::Down));
            }
            if rule.action_key != KEY_RESERVED {
                if let ActKey::Acting(acting) = state.act_key {
                    if acting == rule.hold_key {
                        out.push(InputEvent::key(rule.action_key, Value::Down));
                    }
                }
            }
            if let ActKey::Acting(acting) = state.act_key {
                out.push(InputEvent::key(acting, Value::Up));
            }
            state.act_key = ActKey::Idle;
            *ignore = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::keycodes::{KEY_A, KEY_LEFTCTRL, KEY_X};

    fn run(
        rule: &TapHoldRule,
        state: &mut TapHoldState,
        code: u16,
        value: Value,
        shadow: &KeyStateShadow,
    ) -> (bool, ArrayVec<InputEvent, MAX_SYNTH_EVENTS>) {
        let mut ignore = false;
        let mut out = ArrayVec::new();
        process(rule, state, code, value, shadow, false, &mut ignore, &mut out);
        (ignore, out)
    }

    #[test]
    fn clean_tap_emits_tap_key() {
        let rule = TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL);
        let mut state = TapHoldState::default();
        let shadow = KeyStateShadow::new();

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Down, &shadow);
        assert!(ignore);
        assert!(out.is_empty());

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Up, &shadow);
        assert!(ignore);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_A, Value::Down), InputEvent::key(KEY_A, Value::Up)]);
        assert_eq!(state.act_key, ActKey::Idle);
    }

    #[test]
    fn other_key_down_while_armed_commits_hold() {
        let rule = TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL);
        let mut state = TapHoldState::default();
        let shadow = KeyStateShadow::new();

        let (ignore, _) = run(&rule, &mut state, KEY_A, Value::Down, &shadow);
        assert!(ignore);

        let mut ignore = false;
        let mut out = ArrayVec::new();
        let committed = process(
            &rule, &mut state, KEY_X, Value::Down, &shadow, false, &mut ignore, &mut out,
        );
        assert!(!ignore, "unscoped action key: the other key's down passes through");
        assert_eq!(committed, Some((KEY_A, KEY_A)));
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_LEFTCTRL, Value::Down)]);
        assert_eq!(state.act_key, ActKey::Acting(KEY_LEFTCTRL));

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Up, &shadow);
        assert!(ignore);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_LEFTCTRL, Value::Up)]);
        assert_eq!(state.act_key, ActKey::Idle);
    }

    #[test]
    fn repeat_delay_falls_back_to_repeat_key() {
        let rule = TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL).with_repeat(KEY_A, 2);
        let mut state = TapHoldState::default();
        let shadow = KeyStateShadow::new();

        run(&rule, &mut state, KEY_A, Value::Down, &shadow);

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Repeat, &shadow);
        assert!(ignore);
        assert!(out.is_empty());
        assert_eq!(state.curr_delay, 1);

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Repeat, &shadow);
        assert!(ignore);
        assert!(out.is_empty());
        assert_eq!(state.curr_delay, 0);

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Repeat, &shadow);
        assert!(ignore);
        assert_eq!(
            out.as_slice(),
            [InputEvent::key(KEY_A, Value::Down), InputEvent::key(KEY_A, Value::Repeat)]
        );
        assert_eq!(state.act_key, ActKey::Acting(KEY_A));

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Up, &shadow);
        assert!(ignore);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_A, Value::Up)]);
    }

    #[test]
    fn hold_key_already_down_in_shadow_resolves_to_immediate_tap() {
        let rule = TapHoldRule::simple(KEY_A, KEY_A, KEY_LEFTCTRL);
        let mut state = TapHoldState::default();
        let mut shadow = KeyStateShadow::new();
        shadow.record(KEY_LEFTCTRL, 1);

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Down, &shadow);
        assert!(ignore);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_A, Value::Down)]);
        assert_eq!(state.act_key, ActKey::Acting(KEY_A));

        let mut ignore = false;
        let mut out = ArrayVec::new();
        let committed = process(
            &rule, &mut state, KEY_X, Value::Down, &shadow, false, &mut ignore, &mut out,
        );
        assert_eq!(committed, None, "already resolved to a tap, nothing to commit");
        assert!(out.is_empty(), "no redundant hold_key press while it's already held");

        let (ignore, out) = run(&rule, &mut state, KEY_A, Value::Up, &shadow);
        assert!(ignore);
        assert_eq!(out.as_slice(), [InputEvent::key(KEY_A, Value::Up)]);
        assert_eq!(state.act_key, ActKey::Idle);
    }
}
