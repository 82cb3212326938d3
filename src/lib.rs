//! Mouse-skill tracking for educational practice widgets.
//!
//! This library measures how well a learner handles a mouse, keeps their
//! progress, and adapts interactive widgets to their skill level.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Mouse Skill Tracker                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │ PointerBus  │──▶│   Tracker   │──▶│   Metrics   │         │
//! │  │  (signals)  │   │ (buffers)   │   │  (compute)  │         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                           │ session end                       │
//! │                           ▼                                   │
//! │  ┌─────────────┐   ┌─────────────┐                           │
//! │  │  Practice   │◀──│ SkillStore  │── badges, streaks,        │
//! │  │  Wrapper    │   │ (persisted) │   adaptive UI config      │
//! │  └─────────────┘   └─────────────┘                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use mouse_skill_tracker::{
//!     MemoryStorage, MouseTracker, PointerBus, PointerSignal, SkillStore, TaskType,
//! };
//!
//! let bus = PointerBus::new();
//! let mut store = SkillStore::open(MemoryStorage::new());
//! let mut tracker = MouseTracker::new(bus.clone());
//!
//! store.start_session("warmup", TaskType::Click);
//! tracker.start_tracking();
//! bus.emit(PointerSignal::movement(0.0, 0.0, 0));
//! bus.emit(PointerSignal::movement(40.0, 30.0, 100));
//! bus.emit(PointerSignal::click(40.0, 30.0, 150));
//! tracker.stop_tracking();
//!
//! let metrics = tracker.metrics();
//! store.end_session(metrics, 50.0);
//! store.update_skill_level(tracker.skill_level());
//! store.update_metrics(metrics);
//! assert_eq!(store.progress().total_sessions, 1);
//! ```

pub mod clock;
pub mod collector;
pub mod config;
pub mod core;
pub mod logging;
pub mod practice;
pub mod store;

// Re-export key types at crate root for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use collector::{PointerBus, PointerSignal, PointerSignalKind, PositionSample, Subscription};
pub use config::{Config, ConfigError};
pub use crate::core::{AgeGroup, Metrics, MouseTracker, SkillCriteria, SkillLevel, TrackingData};
pub use practice::{ModalChoice, PracticeOptions, PracticeWidget, PracticeWrapper};
pub use store::{
    AdaptiveUiConfig, Badge, FileStorage, MemoryStorage, Progress, ProgressStorage, SessionRecord,
    SkillStore, StoreError, StoreOptions, TaskType,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
