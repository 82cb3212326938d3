//! Pointer signal collection.
//!
//! Raw pointer samples enter the crate through a [`PointerBus`]; trackers
//! subscribe to it while active.

pub mod bus;
pub mod types;

// Re-export commonly used types
pub use bus::{PointerBus, Subscription, BACKLOG_WARN_THRESHOLD};
pub use types::{PointerSignal, PointerSignalKind, PositionSample};
