//! Pure metric computations over pointer samples.
//!
//! Every function here is stateless. Degenerate inputs (too few samples)
//! resolve to a documented fallback value rather than an error.

use crate::collector::types::PositionSample;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::f64::consts::PI;

/// Distance from a target that still scores a perfect click, in pixels.
pub const PERFECT_CLICK_RADIUS: f64 = 50.0;

/// Maximum gap between two clicks for the second to count as a double-click.
pub const DOUBLE_CLICK_WINDOW_MS: i64 = 500;

/// Mouse-skill metrics snapshot.
///
/// All fields are 0-100 scores except `speed`, which is pixels per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    pub accuracy: f64,
    pub speed: f64,
    pub smoothness: f64,
    pub drag_control: f64,
    pub click_timing: f64,
    pub double_click_rate: f64,
}

/// Names a single [`Metrics`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Accuracy,
    Speed,
    Smoothness,
    DragControl,
    ClickTiming,
    DoubleClickRate,
}

impl Metrics {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Accuracy => self.accuracy,
            MetricKey::Speed => self.speed,
            MetricKey::Smoothness => self.smoothness,
            MetricKey::DragControl => self.drag_control,
            MetricKey::ClickTiming => self.click_timing,
            MetricKey::DoubleClickRate => self.double_click_rate,
        }
    }
}

/// Euclidean distance between two samples.
pub fn distance(p1: &PositionSample, p2: &PositionSample) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Instantaneous speed in pixels per second. Zero when no time has elapsed.
pub fn speed(p1: &PositionSample, p2: &PositionSample) -> f64 {
    let elapsed_secs = (p2.timestamp - p1.timestamp) as f64 / 1000.0;
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    distance(p1, p2) / elapsed_secs
}

/// Path smoothness, 100 for a straight line and 0 for constant reversals.
///
/// Fewer than three samples have no interior point to judge and score 100.
pub fn smoothness(positions: &[PositionSample]) -> f64 {
    if positions.len() < 3 {
        return 100.0;
    }

    let total: f64 = positions
        .windows(3)
        .map(|w| turning_angle(&w[0], &w[1], &w[2]))
        .sum();
    let average = total / (positions.len() - 2) as f64;

    (100.0 - average.to_degrees()).clamp(0.0, 100.0)
}

/// Turning angle at `b` between segments a->b and b->c, in `[0, PI]`.
fn turning_angle(a: &PositionSample, b: &PositionSample, c: &PositionSample) -> f64 {
    let incoming = (b.y - a.y).atan2(b.x - a.x);
    let outgoing = (c.y - b.y).atan2(c.x - b.x);
    let angle = (outgoing - incoming).abs();
    if angle > PI {
        2.0 * PI - angle
    } else {
        angle
    }
}

/// Average per-click score against the target at the same index.
///
/// Returns 0 without targets or when either list is empty.
pub fn click_accuracy(clicks: &[PositionSample], targets: Option<&[PositionSample]>) -> f64 {
    let Some(targets) = targets else {
        return 0.0;
    };
    if clicks.is_empty() || targets.is_empty() {
        return 0.0;
    }

    let scores: Vec<f64> = clicks
        .iter()
        .zip(targets)
        .map(|(click, target)| {
            (100.0 - distance(click, target) / PERFECT_CLICK_RADIUS * 100.0).max(0.0)
        })
        .collect();

    scores.iter().mean()
}

/// Mean drag-gesture quality across all recorded gestures.
pub fn drag_control(drag_paths: &[Vec<PositionSample>]) -> f64 {
    let scores: Vec<f64> = drag_paths
        .iter()
        .filter(|path| path.len() >= 2)
        .map(|path| gesture_score(path))
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().mean().clamp(0.0, 100.0)
}

/// Average of a gesture's smoothness and its speed consistency.
fn gesture_score(path: &[PositionSample]) -> f64 {
    let speeds: Vec<f64> = path.windows(2).map(|w| speed(&w[0], &w[1])).collect();
    let consistency = (100.0 - population_variance(&speeds).sqrt() / 10.0).max(0.0);

    (smoothness(path) + consistency) / 2.0
}

/// Consistency of the intervals between clicks. Needs at least two clicks.
pub fn click_timing_score(clicks: &[PositionSample]) -> f64 {
    if clicks.len() < 2 {
        return 0.0;
    }

    let intervals: Vec<f64> = clicks
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp) as f64)
        .collect();

    (100.0 - population_variance(&intervals).sqrt() / 50.0).clamp(0.0, 100.0)
}

/// Whether a click at `current` follows `previous` closely enough to count
/// as a double-click.
pub fn is_double_click(previous: i64, current: i64) -> bool {
    current - previous < DOUBLE_CLICK_WINDOW_MS
}

/// Share of clicks that were double-clicks, as a rounded percentage.
pub fn double_click_rate(total_clicks: usize, double_click_count: usize) -> f64 {
    if total_clicks == 0 {
        return 0.0;
    }
    (double_click_count as f64 / total_clicks as f64 * 100.0).round()
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_variance()
}
