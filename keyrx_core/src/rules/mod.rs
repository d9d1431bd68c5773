//! The three rule families, applied in fixed order by [`crate::Engine`]:
//! map, then tap/hold, then multi-key.

pub mod map;
pub mod multi_key;
pub mod tap_hold;
