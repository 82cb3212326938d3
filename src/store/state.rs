//! The persisted contents of the skill store.

use crate::core::metrics::Metrics;
use crate::core::skill::{AgeGroup, SkillLevel};
use crate::store::types::{Progress, SessionRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the skill store owns and persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreState {
    pub user_id: String,
    pub current_level: SkillLevel,
    pub metrics: Metrics,
    pub progress: Progress,
    /// Full session log, oldest first
    pub sessions: Vec<SessionRecord>,
    pub current_session: Option<String>,
    pub unlocked_badges: Vec<String>,
    pub age_group: AgeGroup,
    #[serde(rename = "adaptiveUIEnabled")]
    pub adaptive_ui_enabled: bool,
    pub gamification_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(new_user_id())
    }
}

impl StoreState {
    /// Factory defaults for a given user.
    pub fn new(user_id: String) -> Self {
        Self {
            progress: Progress::new(user_id.clone()),
            user_id,
            current_level: SkillLevel::Beginner,
            metrics: Metrics::default(),
            sessions: Vec::new(),
            current_session: None,
            unlocked_badges: Vec::new(),
            age_group: AgeGroup::NineToEleven,
            adaptive_ui_enabled: true,
            gamification_enabled: true,
            sound_enabled: true,
        }
    }
}

pub fn new_user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}
