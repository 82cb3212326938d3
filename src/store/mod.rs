//! Skill progress store.
//!
//! The [`SkillStore`] owns every piece of persisted skill and progress data:
//! current level and metrics, the session log, the badge catalog, the daily
//! streak, and user preferences. It is an explicit object handed to whoever
//! needs it rather than a global, and every mutation is written through to
//! its [`ProgressStorage`].

pub mod adaptive;
pub mod badges;
pub mod persistence;
pub mod state;
pub mod types;

pub use adaptive::AdaptiveUiConfig;
pub use persistence::{FileStorage, MemoryStorage, ProgressStorage, SCHEMA_VERSION, STORAGE_KEY};
pub use state::StoreState;
pub use types::{
    Badge, BadgeRarity, BadgeRequirement, Difficulty, MetricThresholds, Progress, SessionRecord,
    TaskType,
};

use crate::clock::{Clock, SystemClock};
use crate::core::metrics::Metrics;
use crate::core::skill::{AgeGroup, SkillCriteria, SkillLevel};
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Length of the most-recent-first session list kept in [`Progress`].
pub const MAX_RECENT_SESSIONS: usize = 10;

/// Score below which a metric earns an improvement suggestion.
pub const IMPROVEMENT_THRESHOLD: f64 = 70.0;

pub const IMPROVE_ACCURACY: &str = "Practice clicking on targets to improve click accuracy";
pub const IMPROVE_SMOOTHNESS: &str = "Try smoother movement with steady, straight strokes";
pub const IMPROVE_DRAGGING: &str = "Practice dragging objects with controlled, even speed";

/// Errors from persistence and import/export.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid progress data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// How a store locates its data and computes calendar days.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub storage_key: String,
    /// Timezone for calendar-day streaks; the system zone when unset
    pub timezone: Option<Tz>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            timezone: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    version: u32,
    exported_at: DateTime<Utc>,
    user_id: &'a str,
    age_group: AgeGroup,
    progress: &'a Progress,
    unlocked_badges: &'a [String],
    sessions: &'a [SessionRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    user_id: Option<String>,
    age_group: Option<AgeGroup>,
    progress: Option<Progress>,
    unlocked_badges: Option<Vec<String>>,
    sessions: Option<Vec<SessionRecord>>,
}

/// Persisted skill and progress state for one user.
pub struct SkillStore {
    state: StoreState,
    storage: Box<dyn ProgressStorage>,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
}

impl SkillStore {
    /// Open a store on the given storage with the system clock.
    pub fn open(storage: impl ProgressStorage + 'static) -> Self {
        Self::open_with(Box::new(storage), Arc::new(SystemClock), StoreOptions::default())
    }

    /// Open a store, loading any previously persisted state.
    ///
    /// Unreadable or incompatible state is logged and replaced by defaults.
    pub fn open_with(
        storage: Box<dyn ProgressStorage>,
        clock: Arc<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        let state = match persistence::load_state(storage.as_ref(), &options.storage_key) {
            Ok(Some(state)) => {
                tracing::debug!(user = %state.user_id, "loaded skill store");
                state
            }
            Ok(None) => StoreState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not load skill store, starting fresh");
                StoreState::default()
            }
        };

        Self {
            state,
            storage,
            clock,
            options,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn user_id(&self) -> &str {
        &self.state.user_id
    }

    pub fn current_level(&self) -> SkillLevel {
        self.state.current_level
    }

    pub fn metrics(&self) -> Metrics {
        self.state.metrics
    }

    pub fn progress(&self) -> &Progress {
        &self.state.progress
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.state.sessions
    }

    pub fn current_session(&self) -> Option<&SessionRecord> {
        let id = self.state.current_session.as_deref()?;
        self.state.sessions.iter().rev().find(|s| s.session_id == id)
    }

    pub fn unlocked_badges(&self) -> &[String] {
        &self.state.unlocked_badges
    }

    pub fn badges(&self) -> &[Badge] {
        &self.state.progress.badges
    }

    pub fn age_group(&self) -> AgeGroup {
        self.state.age_group
    }

    pub fn adaptive_ui_enabled(&self) -> bool {
        self.state.adaptive_ui_enabled
    }

    pub fn gamification_enabled(&self) -> bool {
        self.state.gamification_enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.state.sound_enabled
    }

    /// Replace the current metrics and evaluate badge unlocks against them.
    pub fn update_metrics(&mut self, metrics: Metrics) {
        self.state.metrics = metrics;
        self.state.progress.metrics = metrics;
        self.check_badge_unlocks(&metrics);
        self.persist();
    }

    pub fn update_skill_level(&mut self, level: SkillLevel) {
        if level != self.state.current_level {
            tracing::info!(from = %self.state.current_level, to = %level, "skill level changed");
        }
        self.state.current_level = level;
        self.state.progress.current_level = level;
        self.persist();
    }

    /// Open a new practice session and make it current.
    pub fn start_session(&mut self, session_id: impl Into<String>, task_type: TaskType) {
        let session_id = session_id.into();
        if let Some(previous) = &self.state.current_session {
            tracing::warn!(previous = %previous, "starting a session while another is open");
        }

        self.state.sessions.push(SessionRecord {
            session_id: session_id.clone(),
            start_time: self.clock.now(),
            end_time: None,
            task_type,
            difficulty: Difficulty::Easy,
            score: 0.0,
            metrics: self.state.metrics,
            improvements: Vec::new(),
        });
        tracing::info!(session = %session_id, task = %task_type, "practice session started");
        self.state.current_session = Some(session_id);
        self.persist();
    }

    /// Finalize the current session. Returns `None` when there is none.
    pub fn end_session(&mut self, metrics: Metrics, score: f64) -> Option<SessionRecord> {
        let Some(session_id) = self.state.current_session.take() else {
            tracing::debug!("end_session called without an open session");
            return None;
        };

        let now = self.clock.now();
        let Some(index) = self
            .state
            .sessions
            .iter()
            .rposition(|s| s.session_id == session_id)
        else {
            tracing::warn!(session = %session_id, "open session missing from the log");
            self.persist();
            return None;
        };

        let session = &mut self.state.sessions[index];
        session.end_time = Some(now);
        session.metrics = metrics;
        session.score = score;
        session.improvements = improvements_for(&metrics);
        let finished = session.clone();

        let progress = &mut self.state.progress;
        progress.total_practice_time += finished.duration_minutes();
        progress.total_sessions += 1;
        progress.recent_sessions.insert(0, finished.clone());
        progress.recent_sessions.truncate(MAX_RECENT_SESSIONS);

        tracing::info!(
            session = %finished.session_id,
            score,
            minutes = finished.duration_minutes(),
            "practice session ended"
        );

        self.update_daily_streak();
        Some(finished)
    }

    /// Unlock a badge once. Returns `true` only when it was newly unlocked.
    pub fn unlock_badge(&mut self, badge_id: &str) -> bool {
        if self.unlock_quietly(badge_id) {
            self.persist();
            true
        } else {
            false
        }
    }

    fn unlock_quietly(&mut self, badge_id: &str) -> bool {
        if self.state.unlocked_badges.iter().any(|id| id == badge_id) {
            return false;
        }
        let now = self.clock.now();
        let Some(index) = self
            .state
            .progress
            .badges
            .iter()
            .position(|b| b.id == badge_id)
        else {
            tracing::warn!(badge = %badge_id, "unknown badge id");
            return false;
        };

        let badge = &mut self.state.progress.badges[index];
        badge.unlocked_at.get_or_insert(now);
        self.state.unlocked_badges.push(badge_id.to_string());
        tracing::info!(badge = %badge_id, "badge unlocked");
        true
    }

    /// Unlock every badge whose requirement now holds. Returns the new ids.
    pub fn check_badge_unlocks(&mut self, metrics: &Metrics) -> Vec<String> {
        let progress = &self.state.progress;
        let ready: Vec<String> = progress
            .badges
            .iter()
            .filter(|badge| !self.state.unlocked_badges.contains(&badge.id))
            .filter(|badge| badges::requirement_met(&badge.requirement, metrics, progress))
            .map(|badge| badge.id.clone())
            .collect();

        let unlocked: Vec<String> = ready
            .into_iter()
            .filter(|id| self.unlock_quietly(id))
            .collect();
        if !unlocked.is_empty() {
            self.persist();
        }
        unlocked
    }

    /// Interaction affordances for the current level.
    ///
    /// With adaptive UI switched off this is always the expert configuration.
    pub fn adaptive_ui_config(&self) -> AdaptiveUiConfig {
        if self.state.adaptive_ui_enabled {
            AdaptiveUiConfig::for_level(self.state.current_level)
        } else {
            AdaptiveUiConfig::for_level(SkillLevel::Expert)
        }
    }

    /// Criteria table for the selected age group.
    pub fn skill_criteria(&self) -> SkillCriteria {
        SkillCriteria::for_age_group(self.state.age_group)
    }

    /// Advance, keep, or restart the daily streak and stamp the practice time.
    pub fn update_daily_streak(&mut self) {
        let now = self.clock.now();
        let today = self.calendar_date(now);
        let last_day = self
            .state
            .progress
            .last_practice_date
            .map(|at| self.calendar_date(at));

        let progress = &mut self.state.progress;
        match last_day {
            Some(day) if day == today => {}
            Some(day) if Some(day) == today.pred_opt() => progress.daily_streak += 1,
            _ => progress.daily_streak = 1,
        }
        progress.last_practice_date = Some(now);
        tracing::debug!(streak = progress.daily_streak, "daily streak updated");
        self.persist();
    }

    fn calendar_date(&self, at: DateTime<Utc>) -> NaiveDate {
        match self.options.timezone {
            Some(tz) => at.with_timezone(&tz).date_naive(),
            None => at.with_timezone(&Local).date_naive(),
        }
    }

    pub fn set_age_group(&mut self, age_group: AgeGroup) {
        self.state.age_group = age_group;
        self.persist();
    }

    pub fn toggle_adaptive_ui(&mut self) -> bool {
        self.state.adaptive_ui_enabled = !self.state.adaptive_ui_enabled;
        self.persist();
        self.state.adaptive_ui_enabled
    }

    pub fn toggle_gamification(&mut self) -> bool {
        self.state.gamification_enabled = !self.state.gamification_enabled;
        self.persist();
        self.state.gamification_enabled
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_enabled = !self.state.sound_enabled;
        self.persist();
        self.state.sound_enabled
    }

    /// Restore skill and progress data to factory defaults.
    ///
    /// The user id, age group and feature toggles are preferences and survive.
    pub fn reset_progress(&mut self) {
        let fresh = StoreState::new(self.state.user_id.clone());
        self.state = StoreState {
            age_group: self.state.age_group,
            adaptive_ui_enabled: self.state.adaptive_ui_enabled,
            gamification_enabled: self.state.gamification_enabled,
            sound_enabled: self.state.sound_enabled,
            ..fresh
        };
        tracing::info!(user = %self.state.user_id, "progress reset");
        self.persist();
    }

    /// Serialize the user's progress into a portable JSON document.
    pub fn export_progress(&self) -> Result<String, StoreError> {
        let document = ExportDocument {
            version: SCHEMA_VERSION,
            exported_at: self.clock.now(),
            user_id: &self.state.user_id,
            age_group: self.state.age_group,
            progress: &self.state.progress,
            unlocked_badges: &self.state.unlocked_badges,
            sessions: &self.state.sessions,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write an export document named after today's date into `dir`.
    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let date = self.calendar_date(self.clock.now());
        let path = dir.join(format!("mouse-skill-progress-{}.json", date.format("%Y-%m-%d")));
        std::fs::create_dir_all(dir)?;
        std::fs::write(&path, self.export_progress()?)?;
        Ok(path)
    }

    /// Replace progress data from an exported document.
    ///
    /// Fields absent from the document are left as they are. An open session
    /// stays open if the resulting log still holds it unfinished. On a parse
    /// error the store is untouched and the error is logged and returned.
    pub fn import_progress(&mut self, data: &str) -> Result<(), StoreError> {
        let document: ImportDocument = match serde_json::from_str(data) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "failed to import progress");
                return Err(e.into());
            }
        };

        if let Some(user_id) = document.user_id {
            self.state.user_id = user_id;
        }
        if let Some(age_group) = document.age_group {
            self.state.age_group = age_group;
        }
        if let Some(progress) = document.progress {
            self.state.current_level = progress.current_level;
            self.state.metrics = progress.metrics;
            self.state.progress = progress;
        }
        if let Some(unlocked) = document.unlocked_badges {
            self.state.unlocked_badges = unlocked;
        }
        if let Some(sessions) = document.sessions {
            self.state.sessions = sessions;
        }
        if let Some(open) = &self.state.current_session {
            let still_open = self
                .state
                .sessions
                .iter()
                .any(|s| s.session_id == *open && !s.is_finished());
            if !still_open {
                tracing::warn!(session = %open, "open session not in imported log, closing it");
                self.state.current_session = None;
            }
        }

        tracing::info!(user = %self.state.user_id, "progress imported");
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) =
            persistence::save_state(self.storage.as_ref(), &self.options.storage_key, &self.state)
        {
            tracing::warn!(error = %e, "failed to persist skill store");
        }
    }
}

impl std::fmt::Debug for SkillStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillStore")
            .field("state", &self.state)
            .field("options", &self.options)
            .finish()
    }
}

/// Suggestions for each metric below [`IMPROVEMENT_THRESHOLD`].
pub fn improvements_for(metrics: &Metrics) -> Vec<String> {
    [
        (metrics.accuracy, IMPROVE_ACCURACY),
        (metrics.smoothness, IMPROVE_SMOOTHNESS),
        (metrics.drag_control, IMPROVE_DRAGGING),
    ]
    .into_iter()
    .filter(|(value, _)| *value < IMPROVEMENT_THRESHOLD)
    .map(|(_, message)| message.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn store_at(now: DateTime<Utc>) -> (SkillStore, FixedClock, MemoryStorage) {
        let clock = FixedClock::new(now);
        let storage = MemoryStorage::new();
        let store = SkillStore::open_with(
            Box::new(storage.clone()),
            Arc::new(clock.clone()),
            StoreOptions {
                timezone: Some(chrono_tz::UTC),
                ..StoreOptions::default()
            },
        );
        (store, clock, storage)
    }

    fn metrics(accuracy: f64, smoothness: f64, drag_control: f64) -> Metrics {
        Metrics {
            accuracy,
            speed: 200.0,
            smoothness,
            drag_control,
            click_timing: 85.0,
            double_click_rate: 60.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let (store, _, _) = store_at(noon());
        assert_eq!(store.current_level(), SkillLevel::Beginner);
        assert_eq!(store.metrics(), Metrics::default());
        assert_eq!(store.badges().len(), 10);
        assert!(store.unlocked_badges().is_empty());
        assert_eq!(store.age_group(), AgeGroup::NineToEleven);
        assert!(store.adaptive_ui_enabled());
        assert!(store.gamification_enabled());
        assert!(store.sound_enabled());
    }

    #[test]
    fn test_unlock_badge_idempotent() {
        let (mut store, clock, _) = store_at(noon());
        assert!(store.unlock_badge(badges::SHARPSHOOTER));
        let first_stamp = store.badges()[1].unlocked_at;

        clock.advance(Duration::hours(1));
        assert!(!store.unlock_badge(badges::SHARPSHOOTER));

        let count = store
            .unlocked_badges()
            .iter()
            .filter(|id| *id == badges::SHARPSHOOTER)
            .count();
        assert_eq!(count, 1);
        assert_eq!(store.badges()[1].unlocked_at, first_stamp);
    }

    #[test]
    fn test_unknown_badge_ignored() {
        let (mut store, _, _) = store_at(noon());
        assert!(!store.unlock_badge("no-such-badge"));
        assert!(store.unlocked_badges().is_empty());
    }

    #[test]
    fn test_session_lifecycle() {
        let (mut store, clock, _) = store_at(noon());
        store.start_session("s1", TaskType::Click);
        assert_eq!(store.current_session().map(|s| s.session_id.as_str()), Some("s1"));
        assert!(store.sessions()[0].end_time.is_none());

        clock.advance(Duration::minutes(3));
        let finished = store.end_session(metrics(80.0, 75.0, 70.0), 85.0).unwrap();

        assert_eq!(store.sessions()[0].score, 85.0);
        assert!(store.sessions()[0].end_time.is_some());
        assert!(store.sessions()[0].improvements.is_empty());
        assert_eq!(store.progress().total_sessions, 1);
        assert_eq!(store.progress().recent_sessions.len(), 1);
        assert!((store.progress().total_practice_time - 3.0).abs() < 1e-9);
        assert_eq!(store.progress().daily_streak, 1);
        assert!(store.current_session().is_none());
        assert_eq!(finished, store.sessions()[0]);
    }

    #[test]
    fn test_low_metrics_generate_improvements() {
        let (mut store, _, _) = store_at(noon());
        store.start_session("s1", TaskType::Mixed);
        store.end_session(metrics(50.0, 50.0, 50.0), 40.0);

        let improvements = &store.sessions()[0].improvements;
        assert_eq!(improvements.len(), 3);
        assert!(improvements.iter().any(|m| m == IMPROVE_ACCURACY));
        assert!(improvements.iter().any(|m| m == IMPROVE_SMOOTHNESS));
        assert!(improvements.iter().any(|m| m == IMPROVE_DRAGGING));
    }

    #[test]
    fn test_end_session_without_current_is_noop() {
        let (mut store, _, _) = store_at(noon());
        assert!(store.end_session(Metrics::default(), 10.0).is_none());
        assert_eq!(store.progress().total_sessions, 0);
        assert!(store.progress().last_practice_date.is_none());
    }

    #[test]
    fn test_recent_sessions_capped() {
        let (mut store, _, _) = store_at(noon());
        for i in 0..12 {
            store.start_session(format!("s{i}"), TaskType::Drag);
            store.end_session(Metrics::default(), i as f64);
        }
        let recent = &store.progress().recent_sessions;
        assert_eq!(recent.len(), MAX_RECENT_SESSIONS);
        assert_eq!(recent[0].session_id, "s11");
        assert_eq!(store.sessions().len(), 12);
    }

    #[test]
    fn test_badge_unlock_cascade() {
        let (mut store, _, _) = store_at(noon());
        let unlocked = store.check_badge_unlocks(&Metrics {
            accuracy: 95.0,
            speed: 350.0,
            smoothness: 95.0,
            drag_control: 95.0,
            click_timing: 95.0,
            double_click_rate: 80.0,
        });

        for id in [
            badges::SHARPSHOOTER,
            badges::SPEED_DEMON,
            badges::SMOOTH_OPERATOR,
            badges::RHYTHM_KEEPER,
            badges::ALL_ROUNDER,
        ] {
            assert!(unlocked.iter().any(|u| u == id), "{id} not unlocked");
        }
        assert!(!unlocked.iter().any(|u| u == badges::FIRST_CLICK));
        assert!(!unlocked.iter().any(|u| u == badges::WEEK_WARRIOR));
        assert!(store
            .badges()
            .iter()
            .filter(|b| unlocked.contains(&b.id))
            .all(|b| b.is_unlocked()));
    }

    #[test]
    fn test_aggregate_badges_follow_progress() {
        let (mut store, _, _) = store_at(noon());
        store.start_session("s1", TaskType::Click);
        store.end_session(Metrics::default(), 0.0);
        store.update_metrics(Metrics::default());
        assert!(store.unlocked_badges().iter().any(|id| id == badges::FIRST_CLICK));
        assert!(!store.unlocked_badges().iter().any(|id| id == badges::CENTURION));
    }

    #[test]
    fn test_month_long_streak_unlocks_both_streak_badges() {
        let (mut store, _, _) = store_at(noon());
        store.state.progress.daily_streak = 30;
        let unlocked = store.check_badge_unlocks(&Metrics::default());

        assert!(unlocked.iter().any(|id| id == badges::MONTHLY_MASTER));
        assert!(unlocked.iter().any(|id| id == badges::WEEK_WARRIOR));
        assert!(!unlocked.iter().any(|id| id == badges::CENTURION));
    }

    #[test]
    fn test_hundred_sessions_unlocks_centurion() {
        let (mut store, _, _) = store_at(noon());
        store.state.progress.total_sessions = 99;
        assert!(!store
            .check_badge_unlocks(&Metrics::default())
            .iter()
            .any(|id| id == badges::CENTURION));

        store.state.progress.total_sessions = 100;
        let unlocked = store.check_badge_unlocks(&Metrics::default());
        assert_eq!(unlocked, vec![badges::CENTURION.to_string()]);
        assert!(store.unlocked_badges().iter().any(|id| id == badges::FIRST_CLICK));
        assert!(!store.unlocked_badges().iter().any(|id| id == badges::MONTHLY_MASTER));
    }

    #[test]
    fn test_update_metrics_checks_badges() {
        let (mut store, _, _) = store_at(noon());
        let m = Metrics {
            speed: 320.0,
            ..Metrics::default()
        };
        store.update_metrics(m);
        assert_eq!(store.metrics(), m);
        assert_eq!(store.progress().metrics, m);
        assert_eq!(store.unlocked_badges(), [badges::SPEED_DEMON.to_string()]);
    }

    #[test]
    fn test_streak_from_yesterday_increments() {
        let (mut store, clock, _) = store_at(noon() - Duration::days(1));
        store.update_daily_streak();
        assert_eq!(store.progress().daily_streak, 1);

        clock.set(noon());
        store.update_daily_streak();
        assert_eq!(store.progress().daily_streak, 2);
        assert_eq!(store.progress().last_practice_date, Some(noon()));
    }

    #[test]
    fn test_streak_gap_resets() {
        let (mut store, clock, _) = store_at(noon() - Duration::days(3));
        store.update_daily_streak();
        clock.set(noon() - Duration::days(2));
        store.update_daily_streak();
        assert_eq!(store.progress().daily_streak, 2);

        clock.set(noon());
        store.update_daily_streak();
        assert_eq!(store.progress().daily_streak, 1);
    }

    #[test]
    fn test_streak_same_day_refreshes_timestamp() {
        let (mut store, clock, _) = store_at(noon());
        store.update_daily_streak();
        store.update_daily_streak();
        clock.advance(Duration::hours(3));
        store.update_daily_streak();

        assert_eq!(store.progress().daily_streak, 1);
        assert_eq!(
            store.progress().last_practice_date,
            Some(noon() + Duration::hours(3))
        );
    }

    #[test]
    fn test_streak_uses_calendar_days() {
        // 23:30 and 00:30 the next day are consecutive days, one hour apart
        let late = Utc.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        let (mut store, clock, _) = store_at(late);
        store.update_daily_streak();
        clock.advance(Duration::hours(1));
        store.update_daily_streak();
        assert_eq!(store.progress().daily_streak, 2);
    }

    #[test]
    fn test_adaptive_ui_disabled_returns_expert() {
        let (mut store, _, _) = store_at(noon());
        assert_eq!(
            store.adaptive_ui_config(),
            AdaptiveUiConfig::for_level(SkillLevel::Beginner)
        );
        assert!(!store.toggle_adaptive_ui());
        assert_eq!(store.current_level(), SkillLevel::Beginner);
        assert_eq!(
            store.adaptive_ui_config(),
            AdaptiveUiConfig::for_level(SkillLevel::Expert)
        );
    }

    #[test]
    fn test_skill_criteria_follows_age_group() {
        let (mut store, _, _) = store_at(noon());
        assert_eq!(
            store.skill_criteria(),
            SkillCriteria::for_age_group(AgeGroup::NineToEleven)
        );
        store.set_age_group(AgeGroup::SixToEight);
        assert_eq!(
            store.skill_criteria(),
            SkillCriteria::for_age_group(AgeGroup::SixToEight)
        );
    }

    #[test]
    fn test_reset_keeps_preferences() {
        let (mut store, _, _) = store_at(noon());
        let user_id = store.user_id().to_string();
        store.set_age_group(AgeGroup::FifteenPlus);
        store.toggle_sound();
        store.update_skill_level(SkillLevel::Advanced);
        store.start_session("s1", TaskType::Click);
        store.end_session(metrics(95.0, 95.0, 95.0), 90.0);
        store.unlock_badge(badges::DRAG_MASTER);

        store.reset_progress();

        assert_eq!(store.user_id(), user_id);
        assert_eq!(store.progress().user_id, user_id);
        assert_eq!(store.age_group(), AgeGroup::FifteenPlus);
        assert!(!store.sound_enabled());
        assert_eq!(store.current_level(), SkillLevel::Beginner);
        assert_eq!(store.metrics(), Metrics::default());
        assert!(store.sessions().is_empty());
        assert!(store.unlocked_badges().is_empty());
        assert!(store.badges().iter().all(|b| !b.is_unlocked()));
        assert_eq!(store.progress().total_sessions, 0);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let (mut store, _, _) = store_at(noon());
        store.set_age_group(AgeGroup::TwelveToFourteen);
        store.start_session("s1", TaskType::Trace);
        store.end_session(metrics(60.0, 90.0, 90.0), 70.0);
        store.unlock_badge(badges::FIRST_CLICK);

        let before = store.state().clone();
        let exported = store.export_progress().unwrap();
        store.import_progress(&exported).unwrap();

        assert_eq!(store.user_id(), before.user_id);
        assert_eq!(store.age_group(), before.age_group);
        assert_eq!(store.unlocked_badges(), before.unlocked_badges.as_slice());
        assert_eq!(store.sessions(), before.sessions.as_slice());
        assert_eq!(store.progress(), &before.progress);
    }

    #[test]
    fn test_import_into_fresh_store() {
        let (mut source, _, _) = store_at(noon());
        source.start_session("s1", TaskType::Click);
        source.end_session(metrics(90.0, 90.0, 90.0), 90.0);
        source.update_skill_level(SkillLevel::Intermediate);
        let exported = source.export_progress().unwrap();

        let (mut target, _, _) = store_at(noon());
        target.import_progress(&exported).unwrap();
        assert_eq!(target.user_id(), source.user_id());
        assert_eq!(target.current_level(), SkillLevel::Intermediate);
        assert_eq!(target.sessions(), source.sessions());
    }

    #[test]
    fn test_malformed_import_is_noop() {
        let (mut store, _, storage) = store_at(noon());
        store.start_session("s1", TaskType::Click);
        let before = store.state().clone();
        let persisted = storage.get(STORAGE_KEY);

        assert!(store.import_progress("not json").is_err());
        assert!(store.import_progress(r#"{"sessions": 5}"#).is_err());
        assert_eq!(store.state(), &before);
        assert_eq!(storage.get(STORAGE_KEY), persisted);
    }

    #[test]
    fn test_partial_import() {
        let (mut store, _, _) = store_at(noon());
        let user_id = store.user_id().to_string();
        store
            .import_progress(r#"{"ageGroup": "6-8", "somethingElse": true}"#)
            .unwrap();
        assert_eq!(store.age_group(), AgeGroup::SixToEight);
        assert_eq!(store.user_id(), user_id);
    }

    #[test]
    fn test_import_keeps_open_session() {
        let (mut store, clock, _) = store_at(noon());
        store.start_session("s1", TaskType::Click);
        store.import_progress("{}").unwrap();
        assert_eq!(store.current_session().map(|s| s.session_id.as_str()), Some("s1"));

        clock.advance(Duration::minutes(2));
        assert!(store.end_session(metrics(80.0, 80.0, 80.0), 80.0).is_some());
        assert_eq!(store.progress().total_sessions, 1);
    }

    #[test]
    fn test_import_own_export_mid_session() {
        let (mut store, _, _) = store_at(noon());
        store.start_session("s1", TaskType::Drag);
        let exported = store.export_progress().unwrap();
        store.import_progress(&exported).unwrap();

        let finished = store.end_session(metrics(80.0, 80.0, 80.0), 80.0).unwrap();
        assert_eq!(finished.session_id, "s1");
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn test_import_replacing_log_closes_missing_session() {
        let (mut store, _, _) = store_at(noon());
        store.start_session("s1", TaskType::Click);
        store.import_progress(r#"{"sessions": []}"#).unwrap();

        assert!(store.current_session().is_none());
        assert!(store.end_session(Metrics::default(), 0.0).is_none());
        assert_eq!(store.progress().total_sessions, 0);
    }

    #[test]
    fn test_state_persists_across_reopen() {
        let (mut store, clock, storage) = store_at(noon());
        store.set_age_group(AgeGroup::FifteenPlus);
        store.unlock_badge(badges::CENTURION);
        let user_id = store.user_id().to_string();
        drop(store);

        let reopened = SkillStore::open_with(
            Box::new(storage),
            Arc::new(clock),
            StoreOptions::default(),
        );
        assert_eq!(reopened.user_id(), user_id);
        assert_eq!(reopened.age_group(), AgeGroup::FifteenPlus);
        assert_eq!(reopened.unlocked_badges(), [badges::CENTURION.to_string()]);
    }

    #[test]
    fn test_corrupt_storage_starts_fresh() {
        let storage = MemoryStorage::new();
        storage.save(STORAGE_KEY, "{{{").unwrap();
        let store = SkillStore::open(storage);
        assert_eq!(store.current_level(), SkillLevel::Beginner);
        assert!(store.sessions().is_empty());
    }
}
