//! Session-scoped mouse tracker.
//!
//! The tracker is a two-state machine (idle / tracking). While tracking it
//! holds a bus subscription for move, click, press and release signals,
//! buffers samples, and keeps speed and click timing up to date
//! incrementally. The remaining metrics are recomputed on demand by
//! [`MouseTracker::update_metrics`], which callers typically poll about once
//! per second.

use crate::collector::bus::{PointerBus, Subscription};
use crate::collector::types::{PointerSignal, PointerSignalKind, PositionSample};
use crate::core::metrics::{self, Metrics};
use crate::core::skill::SkillLevel;
use serde::{Deserialize, Serialize};

/// Weight of the previous speed in the exponential moving average.
const SPEED_SMOOTHING: f64 = 0.9;

/// Buffers and derived state for the current tracking session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    pub positions: Vec<PositionSample>,
    pub clicks: Vec<PositionSample>,
    pub drag_paths: Vec<Vec<PositionSample>>,
    pub metrics: Metrics,
    pub skill_level: SkillLevel,
}

/// Running aggregates that are not part of the published tracking data.
#[derive(Debug, Default)]
struct RunningState {
    last_position: Option<PositionSample>,
    last_click_time: Option<i64>,
    double_clicks: usize,
    total_clicks: usize,
    drag_buffer: Vec<PositionSample>,
    dragging: bool,
}

/// Tracks pointer activity from a [`PointerBus`] and derives skill metrics.
pub struct MouseTracker {
    bus: PointerBus,
    subscription: Option<Subscription>,
    data: TrackingData,
    running: RunningState,
    targets: Option<Vec<PositionSample>>,
}

impl MouseTracker {
    /// Create an idle tracker bound to a signal source.
    pub fn new(bus: PointerBus) -> Self {
        Self {
            bus,
            subscription: None,
            data: TrackingData::default(),
            running: RunningState::default(),
            targets: None,
        }
    }

    /// Score click accuracy against these targets (paired by index).
    pub fn with_targets(mut self, targets: Vec<PositionSample>) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn set_targets(&mut self, targets: Option<Vec<PositionSample>>) {
        self.targets = targets;
    }

    pub fn is_tracking(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn data(&self) -> &TrackingData {
        &self.data
    }

    pub fn metrics(&self) -> Metrics {
        self.data.metrics
    }

    pub fn skill_level(&self) -> SkillLevel {
        self.data.skill_level
    }

    /// Begin listening for pointer signals. No-op when already tracking.
    pub fn start_tracking(&mut self) {
        if self.is_tracking() {
            return;
        }
        let subscription = self.bus.subscribe(&PointerSignalKind::ALL);
        tracing::debug!(subscription = subscription.id(), "mouse tracking started");
        self.subscription = Some(subscription);
    }

    /// Stop listening and compute final metrics.
    ///
    /// Signals already queued before the stop are still applied; anything
    /// emitted afterwards never reaches this tracker. Buffers are kept.
    pub fn stop_tracking(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            for signal in subscription.drain() {
                self.dispatch(signal);
            }
            tracing::debug!(
                subscription = subscription.id(),
                positions = self.data.positions.len(),
                clicks = self.data.clicks.len(),
                drags = self.data.drag_paths.len(),
                "mouse tracking stopped"
            );
            subscription.unsubscribe();
        }
        self.update_metrics();
    }

    /// Clear every buffer and aggregate. Does not change idle/tracking state.
    pub fn reset_tracking(&mut self) {
        self.data = TrackingData::default();
        self.running = RunningState::default();
    }

    /// Apply all pending signals from the bus. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let pending = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        let count = pending.len();
        for signal in pending {
            self.dispatch(signal);
        }
        count
    }

    /// Handle a single signal directly. Ignored while idle.
    pub fn handle_signal(&mut self, signal: PointerSignal) {
        if self.is_tracking() {
            self.dispatch(signal);
        }
    }

    fn dispatch(&mut self, signal: PointerSignal) {
        match signal.kind {
            PointerSignalKind::Move => self.on_move(signal.sample),
            PointerSignalKind::Click => self.on_click(signal.sample),
            PointerSignalKind::Press => self.on_press(signal.sample),
            PointerSignalKind::Release => self.on_release(),
        }
    }

    fn on_move(&mut self, sample: PositionSample) {
        self.data.positions.push(sample);
        if self.running.dragging {
            self.running.drag_buffer.push(sample);
        }

        if let Some(last) = self.running.last_position {
            let current = metrics::speed(&last, &sample);
            let smoothed = SPEED_SMOOTHING * self.data.metrics.speed
                + (1.0 - SPEED_SMOOTHING) * current;
            self.data.metrics.speed = smoothed.round();
        }
        self.running.last_position = Some(sample);
    }

    fn on_click(&mut self, sample: PositionSample) {
        self.data.clicks.push(sample);
        self.running.total_clicks += 1;

        if let Some(previous) = self.running.last_click_time {
            if metrics::is_double_click(previous, sample.timestamp) {
                self.running.double_clicks += 1;
            }
        }
        self.running.last_click_time = Some(sample.timestamp);

        if self.data.clicks.len() >= 2 {
            self.data.metrics.click_timing = metrics::click_timing_score(&self.data.clicks);
        }
    }

    fn on_press(&mut self, sample: PositionSample) {
        self.running.dragging = true;
        self.running.drag_buffer = vec![sample];
    }

    fn on_release(&mut self) {
        let buffer = std::mem::take(&mut self.running.drag_buffer);
        if self.running.dragging && buffer.len() >= 2 {
            self.data.drag_paths.push(buffer);
        }
        self.running.dragging = false;
    }

    /// Recompute the snapshot metrics and skill level from current buffers.
    ///
    /// Speed and click timing are maintained incrementally and left as-is.
    pub fn update_metrics(&mut self) -> Metrics {
        let data = &mut self.data;
        data.metrics.smoothness = metrics::smoothness(&data.positions);
        data.metrics.drag_control = metrics::drag_control(&data.drag_paths);
        data.metrics.double_click_rate =
            metrics::double_click_rate(self.running.total_clicks, self.running.double_clicks);
        data.metrics.accuracy = metrics::click_accuracy(&data.clicks, self.targets.as_deref());
        data.skill_level = SkillLevel::classify(&data.metrics);
        data.metrics
    }
}

impl Drop for MouseTracker {
    fn drop(&mut self) {
        if self.is_tracking() {
            self.stop_tracking();
        }
    }
}

impl std::fmt::Debug for MouseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MouseTracker")
            .field("tracking", &self.is_tracking())
            .field("positions", &self.data.positions.len())
            .field("clicks", &self.data.clicks.len())
            .field("drag_paths", &self.data.drag_paths.len())
            .field("metrics", &self.data.metrics)
            .finish()
    }
}
