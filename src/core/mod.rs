//! Core mouse-skill functionality.
//!
//! This module contains:
//! - Pure metric computations over pointer samples
//! - Skill-level classification and age-based criteria
//! - The session-scoped mouse tracker

pub mod metrics;
pub mod skill;
pub mod tracker;

// Re-export commonly used types
pub use metrics::{MetricKey, Metrics};
pub use skill::{AgeGroup, SkillCriteria, SkillLevel, SkillThresholds};
pub use tracker::{MouseTracker, TrackingData};
