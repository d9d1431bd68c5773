//! The map stage: a flat, first-match-wins key-code substitution table.
//!
//! Earlier historical revisions of this filter scanned every rule
//! without breaking on a match, so the last matching rule silently won.
//! That ambiguity is resolved here: the first rule whose `from_key`
//! matches wins, and evaluation stops there.

use crate::event::KEY_RESERVED;

/// One map-stage substitution: `from_key` becomes `to_key`. A `to_key`
/// of [`KEY_RESERVED`] drops the event entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRule {
    pub from_key: u16,
    pub to_key: u16,
}

impl MapRule {
    pub const fn new(from_key: u16, to_key: u16) -> Self {
        MapRule { from_key, to_key }
    }

    /// A rule that drops `from_key` entirely instead of remapping it.
    pub const fn drop(from_key: u16) -> Self {
        MapRule {
            from_key,
            to_key: KEY_RESERVED,
        }
    }
}

/// Outcome of running `code` through the map stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    /// No rule matched; `code` passes through unchanged.
    Unchanged(u16),
    /// The first matching rule rewrote the code.
    Remapped(u16),
    /// The first matching rule targets `KEY_RESERVED`; the event is
    /// dropped before any later stage sees it.
    Dropped,
}

/// Apply the map stage to `code`, first-match-wins.
pub fn apply(rules: &[MapRule], code: u16) -> MapOutcome {
    for rule in rules {
        if rule.from_key == code {
            return if rule.to_key == KEY_RESERVED {
                MapOutcome::Dropped
            } else {
                MapOutcome::Remapped(rule.to_key)
            };
        }
    }
    MapOutcome::Unchanged(code)
}
