//! Adaptive practice wrapper around an educational widget.
//!
//! The wrapper never inspects or blocks the widget it hosts. It adds three
//! things on top: an advisory when the learner's level is below what the
//! widget expects, a practice session that runs a [`MouseTracker`], and
//! interaction styling derived from the store's adaptive UI configuration.

use crate::collector::bus::PointerBus;
use crate::core::metrics::Metrics;
use crate::core::skill::SkillLevel;
use crate::core::tracker::MouseTracker;
use crate::store::{AdaptiveUiConfig, SessionRecord, SkillStore, TaskType};
use uuid::Uuid;

/// The only contract a hosted widget has to fulfil.
pub trait PracticeWidget {
    fn on_close(&mut self);
}

/// How the wrapper treats its widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeOptions {
    /// Level the widget is designed for
    pub required_skill_level: Option<SkillLevel>,
    /// Task type for practice sessions; `mixed` when unset
    pub practice_task_type: Option<TaskType>,
    /// Drive styling from the store's adaptive UI configuration
    pub adaptive_ui: bool,
    /// Fixed configuration that takes precedence over the store's
    pub custom_ui: Option<AdaptiveUiConfig>,
}

impl Default for PracticeOptions {
    fn default() -> Self {
        Self {
            required_skill_level: None,
            practice_task_type: None,
            adaptive_ui: true,
            custom_ui: None,
        }
    }
}

/// Non-blocking notice that the learner is below the widget's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    pub current: SkillLevel,
    pub required: SkillLevel,
}

impl Advisory {
    pub fn message(&self) -> String {
        format!(
            "This activity is designed for {} mouse skills (you are currently {}). \
             A quick practice session can help, but you can continue anyway.",
            self.required, self.current
        )
    }
}

/// How the learner left the practice modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalChoice {
    Dismiss,
    ContinueInMaterial,
}

/// Styling knobs applied to the hosted widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionStyle {
    pub min_target_size: u32,
    pub click_padding: u32,
    pub hint_outlines: bool,
    pub practice_overlay: bool,
}

/// A practice session hosted in a modal.
#[derive(Debug)]
pub struct PracticeModal {
    task_type: TaskType,
    session_id: String,
    tracker: MouseTracker,
    completed: bool,
}

impl PracticeModal {
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn tracker(&self) -> &MouseTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut MouseTracker {
        &mut self.tracker
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Apply pending pointer signals without recomputing metrics.
    pub fn apply_pending(&mut self) -> usize {
        self.tracker.pump()
    }

    /// Apply pending pointer signals and refresh the live metrics.
    pub fn pump(&mut self) -> Metrics {
        self.tracker.pump();
        self.tracker.update_metrics()
    }

    /// Stop tracking and hand the final metrics to the store.
    ///
    /// Returns the finished session record; `None` if already completed.
    pub fn complete(&mut self, store: &mut SkillStore) -> Option<SessionRecord> {
        if self.completed {
            return None;
        }
        self.tracker.stop_tracking();
        self.completed = true;

        let metrics = self.tracker.metrics();
        let finished = store.end_session(metrics, session_score(&metrics));
        store.update_skill_level(self.tracker.skill_level());
        store.update_metrics(metrics);
        finished
    }
}

/// Session score: rounded mean of accuracy, smoothness, drag control and timing.
pub fn session_score(metrics: &Metrics) -> f64 {
    ((metrics.accuracy + metrics.smoothness + metrics.drag_control + metrics.click_timing) / 4.0)
        .round()
}

/// Hosts a widget and layers skill-aware behaviour on top of it.
pub struct PracticeWrapper<W> {
    widget: W,
    options: PracticeOptions,
    observed_level: Option<SkillLevel>,
    advisory: Option<Advisory>,
    advisory_dismissed: bool,
    practice_mode: bool,
    modal: Option<PracticeModal>,
}

impl<W: PracticeWidget> PracticeWrapper<W> {
    pub fn new(widget: W, options: PracticeOptions) -> Self {
        Self {
            widget,
            options,
            observed_level: None,
            advisory: None,
            advisory_dismissed: false,
            practice_mode: false,
            modal: None,
        }
    }

    /// Create the wrapper and evaluate it against the store immediately.
    pub fn mount(widget: W, options: PracticeOptions, store: &SkillStore) -> Self {
        let mut wrapper = Self::new(widget, options);
        wrapper.sync(store);
        wrapper
    }

    /// Re-evaluate the advisory if the store's level changed.
    ///
    /// Returns `true` when the level differed from the last observed one.
    pub fn sync(&mut self, store: &SkillStore) -> bool {
        let level = store.current_level();
        if self.observed_level == Some(level) {
            return false;
        }
        self.observed_level = Some(level);
        self.advisory_dismissed = false;
        self.advisory = self
            .options
            .required_skill_level
            .filter(|required| level < *required)
            .map(|required| Advisory {
                current: level,
                required,
            });
        true
    }

    /// The advisory to show, unless there is none or it was dismissed.
    pub fn advisory(&self) -> Option<&Advisory> {
        if self.advisory_dismissed {
            None
        } else {
            self.advisory.as_ref()
        }
    }

    pub fn dismiss_advisory(&mut self) {
        self.advisory_dismissed = true;
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn options(&self) -> &PracticeOptions {
        &self.options
    }

    pub fn practice_mode(&self) -> bool {
        self.practice_mode
    }

    /// Open the practice modal, starting a tracker and a store session.
    ///
    /// An already-open modal is returned as is.
    pub fn open_practice(
        &mut self,
        bus: &PointerBus,
        store: &mut SkillStore,
    ) -> &mut PracticeModal {
        let task_type = self.options.practice_task_type.unwrap_or_default();
        self.modal.get_or_insert_with(|| {
            let session_id = format!("practice-{}", Uuid::new_v4());
            let mut tracker = MouseTracker::new(bus.clone());
            tracker.start_tracking();
            store.start_session(session_id.clone(), task_type);

            PracticeModal {
                task_type,
                session_id,
                tracker,
                completed: false,
            }
        })
    }

    pub fn practice_modal(&self) -> Option<&PracticeModal> {
        self.modal.as_ref()
    }

    pub fn practice_modal_mut(&mut self) -> Option<&mut PracticeModal> {
        self.modal.as_mut()
    }

    /// Close the practice modal.
    ///
    /// Dismissing leaves the widget exactly as it was; continuing turns on
    /// the practice overlay. The modal's tracker is stopped on drop.
    pub fn close_practice(&mut self, choice: ModalChoice) {
        if let Some(modal) = self.modal.take() {
            if !modal.is_completed() {
                tracing::debug!(session = %modal.session_id(), "practice closed before completion");
            }
        }
        if choice == ModalChoice::ContinueInMaterial {
            self.practice_mode = true;
        }
    }

    /// Styling for the widget, or `None` when adaptive UI is off for it.
    pub fn interaction_style(&self, store: &SkillStore) -> Option<InteractionStyle> {
        if !self.options.adaptive_ui {
            return None;
        }
        let config = self
            .options
            .custom_ui
            .unwrap_or_else(|| store.adaptive_ui_config());

        Some(InteractionStyle {
            min_target_size: config.button_size,
            click_padding: config.click_padding,
            hint_outlines: config.show_visual_hints,
            practice_overlay: self.practice_mode,
        })
    }

    /// Close the hosted widget, discarding any open practice modal.
    pub fn close(&mut self) {
        self.modal = None;
        self.widget.on_close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::types::PointerSignal;
    use crate::store::MemoryStorage;

    #[derive(Default)]
    struct Widget {
        closed: u32,
    }

    impl PracticeWidget for Widget {
        fn on_close(&mut self) {
            self.closed += 1;
        }
    }

    fn store() -> SkillStore {
        SkillStore::open(MemoryStorage::new())
    }

    fn requiring(level: SkillLevel) -> PracticeOptions {
        PracticeOptions {
            required_skill_level: Some(level),
            ..PracticeOptions::default()
        }
    }

    #[test]
    fn test_advisory_when_below_requirement() {
        let store = store();
        let wrapper = PracticeWrapper::mount(
            Widget::default(),
            requiring(SkillLevel::Intermediate),
            &store,
        );
        let advisory = wrapper.advisory().unwrap();
        assert_eq!(advisory.current, SkillLevel::Beginner);
        assert_eq!(advisory.required, SkillLevel::Intermediate);
        assert!(advisory.message().contains("intermediate"));
    }

    #[test]
    fn test_no_advisory_when_level_meets_requirement() {
        let mut store = store();
        store.update_skill_level(SkillLevel::Advanced);
        let wrapper =
            PracticeWrapper::mount(Widget::default(), requiring(SkillLevel::Advanced), &store);
        assert!(wrapper.advisory().is_none());

        let unconstrained =
            PracticeWrapper::mount(Widget::default(), PracticeOptions::default(), &store);
        assert!(unconstrained.advisory().is_none());
    }

    #[test]
    fn test_advisory_tracks_level_changes() {
        let mut store = store();
        let mut wrapper =
            PracticeWrapper::mount(Widget::default(), requiring(SkillLevel::Advanced), &store);
        wrapper.dismiss_advisory();
        assert!(wrapper.advisory().is_none());
        assert!(!wrapper.sync(&store));
        assert!(wrapper.advisory().is_none());

        store.update_skill_level(SkillLevel::Intermediate);
        assert!(wrapper.sync(&store));
        assert_eq!(
            wrapper.advisory().map(|a| a.current),
            Some(SkillLevel::Intermediate)
        );

        store.update_skill_level(SkillLevel::Expert);
        wrapper.sync(&store);
        assert!(wrapper.advisory().is_none());
    }

    #[test]
    fn test_dismissed_practice_leaves_widget_alone() {
        let bus = PointerBus::new();
        let mut store = store();
        let mut wrapper =
            PracticeWrapper::mount(Widget::default(), PracticeOptions::default(), &store);

        let modal = wrapper.open_practice(&bus, &mut store);
        assert_eq!(modal.task_type(), TaskType::Mixed);
        assert_eq!(bus.subscriber_count(), 1);

        wrapper.close_practice(ModalChoice::Dismiss);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(!wrapper.practice_mode());
        assert_eq!(wrapper.widget().closed, 0);
        assert!(!wrapper.interaction_style(&store).unwrap().practice_overlay);
    }

    #[test]
    fn test_completed_practice_updates_store() {
        let bus = PointerBus::new();
        let mut store = store();
        let options = PracticeOptions {
            practice_task_type: Some(TaskType::Drag),
            ..PracticeOptions::default()
        };
        let mut wrapper = PracticeWrapper::mount(Widget::default(), options, &store);

        let modal = wrapper.open_practice(&bus, &mut store);
        let t0 = 1_700_000_000_000;
        bus.emit(PointerSignal::press(0.0, 0.0, t0));
        for i in 1..=5 {
            bus.emit(PointerSignal::movement(i as f64 * 20.0, 0.0, t0 + i * 50));
        }
        bus.emit(PointerSignal::release(100.0, 0.0, t0 + 300));
        modal.pump();
        let finished = modal.complete(&mut store).unwrap();

        assert_eq!(finished.task_type, TaskType::Drag);
        assert!(finished.is_finished());
        assert_eq!(store.progress().total_sessions, 1);
        assert_eq!(store.metrics(), finished.metrics);
        assert!(store
            .unlocked_badges()
            .iter()
            .any(|id| id == crate::store::badges::FIRST_CLICK));
        assert!(modal.complete(&mut store).is_none());

        wrapper.close_practice(ModalChoice::ContinueInMaterial);
        assert!(wrapper.practice_mode());
        assert!(wrapper.interaction_style(&store).unwrap().practice_overlay);
    }

    #[test]
    fn test_apply_pending_defers_metrics() {
        let bus = PointerBus::new();
        let mut store = store();
        let mut wrapper =
            PracticeWrapper::mount(Widget::default(), PracticeOptions::default(), &store);
        let modal = wrapper.open_practice(&bus, &mut store);

        bus.emit(PointerSignal::movement(0.0, 0.0, 0));
        bus.emit(PointerSignal::movement(10.0, 0.0, 10));
        bus.emit(PointerSignal::movement(20.0, 5.0, 20));
        assert_eq!(modal.apply_pending(), 3);
        assert_eq!(modal.tracker().data().positions.len(), 3);
        assert_eq!(modal.tracker().metrics().smoothness, 0.0);

        assert!(modal.pump().smoothness > 0.0);
    }

    #[test]
    fn test_style_follows_store_level() {
        let mut store = store();
        let wrapper = PracticeWrapper::mount(Widget::default(), PracticeOptions::default(), &store);

        let beginner = wrapper.interaction_style(&store).unwrap();
        assert_eq!(beginner.min_target_size, 64);
        assert!(beginner.hint_outlines);

        store.update_skill_level(SkillLevel::Expert);
        let expert = wrapper.interaction_style(&store).unwrap();
        assert_eq!(expert.min_target_size, 36);
        assert!(!expert.hint_outlines);
    }

    #[test]
    fn test_style_overrides() {
        let store = store();
        let custom = AdaptiveUiConfig::for_level(SkillLevel::Advanced);
        let wrapper = PracticeWrapper::mount(
            Widget::default(),
            PracticeOptions {
                custom_ui: Some(custom),
                ..PracticeOptions::default()
            },
            &store,
        );
        assert_eq!(
            wrapper.interaction_style(&store).unwrap().min_target_size,
            custom.button_size
        );

        let plain = PracticeWrapper::mount(
            Widget::default(),
            PracticeOptions {
                adaptive_ui: false,
                ..PracticeOptions::default()
            },
            &store,
        );
        assert!(plain.interaction_style(&store).is_none());
    }

    #[test]
    fn test_close_forwards_to_widget() {
        let bus = PointerBus::new();
        let mut store = store();
        let mut wrapper =
            PracticeWrapper::mount(Widget::default(), PracticeOptions::default(), &store);
        wrapper.open_practice(&bus, &mut store);
        wrapper.close();
        assert_eq!(wrapper.widget().closed, 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_session_score() {
        let metrics = Metrics {
            accuracy: 80.0,
            smoothness: 90.0,
            drag_control: 70.0,
            click_timing: 61.0,
            ..Metrics::default()
        };
        assert_eq!(session_score(&metrics), 75.0);
    }
}
