//! keyrx_core - the input-event remapping rule engine.
//!
//! This crate is platform-agnostic: it has no notion of an evdev device, a
//! uinput sink, or any other OS-level concept. It consumes one
//! [`event::InputEvent`] at a time and produces zero or more events to
//! write downstream, threading every event through the three cooperating
//! rule families in a fixed order: the map stage, the tap/hold stage, and
//! the multi-key (chord toggle) stage.
//!
//! The engine is allocation-light by design: synthetic events for a
//! single input event are bounded and returned in an
//! [`arrayvec::ArrayVec`], never a heap-allocated `Vec`.

pub mod engine;
pub mod error;
pub mod event;
pub mod rules;
pub mod shadow;
pub mod typing;

pub use engine::{Engine, MAX_SYNTH_EVENTS};
pub use error::{EngineError, EngineResult};
pub use event::InputEvent;
pub use rules::map::MapRule;
pub use rules::multi_key::MultiKeyRule;
pub use rules::tap_hold::TapHoldRule;
