//! Pointer event types consumed by the mouse tracker.
//!
//! Samples carry a raw coordinate and the wall-clock capture time in
//! milliseconds since the Unix epoch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A raw pointer coordinate with its capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
    /// Milliseconds since epoch
    pub timestamp: i64,
}

impl PositionSample {
    pub fn new(x: f64, y: f64, timestamp: i64) -> Self {
        Self { x, y, timestamp }
    }

    /// Create a sample stamped with the current wall-clock time.
    pub fn now(x: f64, y: f64) -> Self {
        Self::new(x, y, Utc::now().timestamp_millis())
    }
}

/// Pointer signal classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSignalKind {
    /// Pointer movement
    Move,
    /// Completed click
    Click,
    /// Button down
    Press,
    /// Button up
    Release,
}

impl PointerSignalKind {
    /// Every kind the tracker listens to.
    pub const ALL: [PointerSignalKind; 4] = [
        PointerSignalKind::Move,
        PointerSignalKind::Click,
        PointerSignalKind::Press,
        PointerSignalKind::Release,
    ];
}

/// A single pointer signal as dispatched by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSignal {
    pub kind: PointerSignalKind,
    #[serde(flatten)]
    pub sample: PositionSample,
}

impl PointerSignal {
    pub fn new(kind: PointerSignalKind, sample: PositionSample) -> Self {
        Self { kind, sample }
    }

    pub fn movement(x: f64, y: f64, timestamp: i64) -> Self {
        Self::new(PointerSignalKind::Move, PositionSample::new(x, y, timestamp))
    }

    pub fn click(x: f64, y: f64, timestamp: i64) -> Self {
        Self::new(PointerSignalKind::Click, PositionSample::new(x, y, timestamp))
    }

    pub fn press(x: f64, y: f64, timestamp: i64) -> Self {
        Self::new(PointerSignalKind::Press, PositionSample::new(x, y, timestamp))
    }

    pub fn release(x: f64, y: f64, timestamp: i64) -> Self {
        Self::new(PointerSignalKind::Release, PositionSample::new(x, y, timestamp))
    }

    pub fn timestamp(&self) -> i64 {
        self.sample.timestamp
    }
}
