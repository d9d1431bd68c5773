//! Ties the map, tap/hold and multi-key stages together into the single
//! per-event entry point the daemon drives.

use std::time::Instant;

use arrayvec::ArrayVec;
use log::debug;

use crate::error::{EngineError, EngineResult};
use crate::event::{InputEvent, Value, EV_KEY, EV_MSC, MSC_SCAN};
use crate::rules::map::{self, MapOutcome, MapRule};
use crate::rules::multi_key::{self, MultiKeyRule, MultiKeyState};
use crate::rules::tap_hold::{self, TapHoldRule, TapHoldState};
use crate::shadow::{is_modifier, KeyStateShadow};
use crate::typing::TypingDetector;

/// Upper bound on synthetic + pass-through events a single input event
/// can produce. Sized generously above anything the stages actually
/// emit (hold-immediately retraction, chord reconciliation, the final
/// pass-through) so the bound is never reached in practice.
pub const MAX_SYNTH_EVENTS: usize = 16;

/// One input event's worth of output.
pub type EventBatch = ArrayVec<InputEvent, MAX_SYNTH_EVENTS>;

struct TapHoldSlot {
    rule: TapHoldRule,
    state: TapHoldState,
}

struct MultiKeySlot {
    rule: MultiKeyRule,
    state: MultiKeyState,
}

/// The rule engine: owns the rule tables and all runtime state
/// (tap/hold and multi-key per-rule state, the key-state shadow, the
/// typing detector) and exposes [`Engine::process_event`] as its single
/// entry point.
pub struct Engine {
    map_rules: Vec<MapRule>,
    tap_hold: Vec<TapHoldSlot>,
    multi_key: Vec<MultiKeySlot>,
    shadow: KeyStateShadow,
    typing: TypingDetector,
}

impl Engine {
    /// Validate and build an engine from baked-in rule tables.
    pub fn new(
        map_rules: &[MapRule],
        tap_hold_rules: &[TapHoldRule],
        multi_key_rules: &[MultiKeyRule],
    ) -> EngineResult<Self> {
        for (index, rule) in map_rules.iter().enumerate() {
            if rule.from_key == crate::event::KEY_RESERVED {
                return Err(EngineError::ReservedMapSource { index });
            }
        }
        for (index, rule) in tap_hold_rules.iter().enumerate() {
            if rule.base_key == crate::event::KEY_RESERVED {
                return Err(EngineError::ReservedBaseKey { index });
            }
        }
        for (index, rule) in multi_key_rules.iter().enumerate() {
            let count = rule
                .keys
                .iter()
                .take_while(|&&k| k != crate::event::KEY_RESERVED)
                .count();
            if count == 0 {
                return Err(EngineError::EmptyWatchedKeys { index });
            }
            if count > multi_key::MAX_WATCHED_KEYS {
                return Err(EngineError::TooManyWatchedKeys { index, count });
            }
        }

        Ok(Engine {
            map_rules: map_rules.to_vec(),
            tap_hold: tap_hold_rules
                .iter()
                .map(|&rule| TapHoldSlot {
                    rule,
                    state: TapHoldState::default(),
                })
                .collect(),
            multi_key: multi_key_rules
                .iter()
                .map(|&rule| MultiKeySlot {
                    rule,
                    state: MultiKeyState::default(),
                })
                .collect(),
            shadow: KeyStateShadow::new(),
            typing: TypingDetector::new(),
        })
    }

    /// Process one input event, returning the events (synthetic, then
    /// the possibly-rewritten pass-through) to write downstream, in
    /// emission order.
    pub fn process_event(&mut self, event: InputEvent) -> EventBatch {
        let mut out = EventBatch::new();

        if event.is_misc_scan() {
            return out;
        }

        if event.kind != EV_KEY {
            out.push(event);
            return out;
        }

        let Ok(value) = Value::try_from(event.value) else {
            // Malformed EV_KEY value: impossible by construction on a
            // well-formed source. Forward opaquely rather than panic.
            out.push(event);
            return out;
        };

        let map_outcome = map::apply(&self.map_rules, event.code);
        #[cfg(feature = "diagnostics")]
        debug!("map stage: code {} -> {:?}", event.code, map_outcome);
        let mut code = match map_outcome {
            MapOutcome::Dropped => return out,
            MapOutcome::Unchanged(code) | MapOutcome::Remapped(code) => code,
        };

        let now = Instant::now();
        let typing_active = if value == Value::Down {
            self.typing.poll(now)
        } else {
            false
        };

        let mut ignore = false;
        let mut committed: ArrayVec<(u16, u16), 8> = ArrayVec::new();

        #[cfg(feature = "diagnostics")]
        let before_tap_hold = out.len();
        for slot in &mut self.tap_hold {
            if let Some(pair) = tap_hold::process(
                &slot.rule,
                &mut slot.state,
                code,
                value,
                &self.shadow,
                typing_active,
                &mut ignore,
                &mut out,
            ) {
                if committed.try_push(pair).is_err() {
                    debug!("committed tap/hold pair overflow, dropping propagation entry");
                }
            }
        }
        #[cfg(feature = "diagnostics")]
        debug!(
            "tap/hold stage: code {} value {:?} emitted {} event(s), ignore={}",
            code,
            value,
            out.len() - before_tap_hold,
            ignore
        );

        if !committed.is_empty() {
            for slot in &mut self.tap_hold {
                if committed
                    .iter()
                    .any(|&(base, tap)| base == slot.rule.base_key && tap == slot.rule.tap_key)
                {
                    slot.state.was_held = true;
                }
            }
        }

        #[cfg(feature = "diagnostics")]
        let before_multi_key = out.len();
        for slot in &mut self.multi_key {
            if multi_key::process(
                &slot.rule,
                &mut slot.state,
                &mut code,
                value,
                &mut ignore,
                &mut out,
            ) {
                break;
            }
        }
        #[cfg(feature = "diagnostics")]
        debug!(
            "multi-key stage: code {} value {:?} emitted {} event(s), ignore={}",
            code,
            value,
            out.len() - before_multi_key,
            ignore
        );

        for emitted in &out {
            self.note_emitted(*emitted, now);
        }

        if !ignore {
            let passthrough = InputEvent {
                code,
                ..event
            };
            self.note_emitted(passthrough, now);
            out.push(passthrough);
        } else {
            #[cfg(feature = "diagnostics")]
            debug!("code {} suppressed: no pass-through emitted", code);
        }

        out
    }

    fn note_emitted(&mut self, event: InputEvent, now: Instant) {
        if !event.is_key() {
            return;
        }
        self.shadow.record(event.code, event.value);
        if event.value == i32::from(Value::Up) && !is_modifier(event.code) {
            self.typing.note_release(now);
        }
    }
}
