//! Progress, session and badge records held by the skill store.

use crate::core::metrics::{MetricKey, Metrics};
use crate::core::skill::SkillLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of practice task a session exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    Click,
    DoubleClick,
    Drag,
    Trace,
    #[default]
    Mixed,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Click,
        TaskType::DoubleClick,
        TaskType::Drag,
        TaskType::Trace,
        TaskType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Click => "click",
            TaskType::DoubleClick => "double-click",
            TaskType::Drag => "drag",
            TaskType::Trace => "trace",
            TaskType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        TaskType::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| format!("unknown task type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// One practice session. `end_time` stays empty until the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub task_type: TaskType,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl SessionRecord {
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Elapsed minutes between start and end, zero while unfinished.
    pub fn duration_minutes(&self) -> f64 {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds().max(0) as f64 / 60_000.0)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Minimum values for a subset of metrics.
pub type MetricThresholds = BTreeMap<MetricKey, f64>;

/// What it takes to unlock a badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BadgeRequirement {
    /// Every listed metric must reach its threshold.
    Metrics { thresholds: MetricThresholds },
    /// Consecutive practice days.
    DailyStreak { days: u32 },
    /// Completed sessions overall.
    TotalSessions { count: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: BadgeRequirement,
    pub rarity: BadgeRarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Persistent progress record for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    pub user_id: String,
    pub current_level: SkillLevel,
    pub total_sessions: u32,
    /// Minutes
    pub total_practice_time: f64,
    pub metrics: Metrics,
    pub badges: Vec<Badge>,
    /// Most recent first
    pub recent_sessions: Vec<SessionRecord>,
    pub daily_streak: u32,
    pub last_practice_date: Option<DateTime<Utc>>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Progress {
    /// Fresh progress with the default badge catalog.
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            current_level: SkillLevel::Beginner,
            total_sessions: 0,
            total_practice_time: 0.0,
            metrics: Metrics::default(),
            badges: crate::store::badges::default_badges(),
            recent_sessions: Vec::new(),
            daily_streak: 0,
            last_practice_date: None,
        }
    }
}
