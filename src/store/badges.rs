//! Badge catalog and unlock rules.

use crate::core::metrics::{MetricKey, Metrics};
use crate::store::types::{Badge, BadgeRarity, BadgeRequirement, MetricThresholds, Progress};

pub const FIRST_CLICK: &str = "first-click";
pub const SHARPSHOOTER: &str = "sharpshooter";
pub const SPEED_DEMON: &str = "speed-demon";
pub const SMOOTH_OPERATOR: &str = "smooth-operator";
pub const DRAG_MASTER: &str = "drag-master";
pub const RHYTHM_KEEPER: &str = "rhythm-keeper";
pub const ALL_ROUNDER: &str = "all-rounder";
pub const WEEK_WARRIOR: &str = "week-warrior";
pub const MONTHLY_MASTER: &str = "monthly-master";
pub const CENTURION: &str = "centurion";

fn badge(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    requirement: BadgeRequirement,
    rarity: BadgeRarity,
) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        requirement,
        rarity,
        unlocked_at: None,
    }
}

fn metrics(thresholds: &[(MetricKey, f64)]) -> BadgeRequirement {
    BadgeRequirement::Metrics {
        thresholds: thresholds.iter().copied().collect::<MetricThresholds>(),
    }
}

/// The fixed catalog every store starts with. Nothing is unlocked.
pub fn default_badges() -> Vec<Badge> {
    vec![
        badge(
            FIRST_CLICK,
            "First Click",
            "Complete your first practice session",
            "🖱️",
            BadgeRequirement::TotalSessions { count: 1 },
            BadgeRarity::Common,
        ),
        badge(
            SHARPSHOOTER,
            "Sharpshooter",
            "Reach 90% click accuracy",
            "🎯",
            metrics(&[(MetricKey::Accuracy, 90.0)]),
            BadgeRarity::Rare,
        ),
        badge(
            SPEED_DEMON,
            "Speed Demon",
            "Move at 300 pixels per second",
            "⚡",
            metrics(&[(MetricKey::Speed, 300.0)]),
            BadgeRarity::Rare,
        ),
        badge(
            SMOOTH_OPERATOR,
            "Smooth Operator",
            "Reach 90 movement smoothness",
            "🌊",
            metrics(&[(MetricKey::Smoothness, 90.0)]),
            BadgeRarity::Rare,
        ),
        badge(
            DRAG_MASTER,
            "Drag Master",
            "Reach 90 drag control",
            "🧲",
            metrics(&[(MetricKey::DragControl, 90.0)]),
            BadgeRarity::Epic,
        ),
        badge(
            RHYTHM_KEEPER,
            "Rhythm Keeper",
            "Click with 95 timing consistency",
            "🥁",
            metrics(&[(MetricKey::ClickTiming, 95.0)]),
            BadgeRarity::Epic,
        ),
        badge(
            ALL_ROUNDER,
            "All-Rounder",
            "Score 85 or more in accuracy, smoothness, drag control and timing",
            "🏆",
            metrics(&[
                (MetricKey::Accuracy, 85.0),
                (MetricKey::Smoothness, 85.0),
                (MetricKey::DragControl, 85.0),
                (MetricKey::ClickTiming, 85.0),
            ]),
            BadgeRarity::Legendary,
        ),
        badge(
            WEEK_WARRIOR,
            "Week Warrior",
            "Practice 7 days in a row",
            "📅",
            BadgeRequirement::DailyStreak { days: 7 },
            BadgeRarity::Rare,
        ),
        badge(
            MONTHLY_MASTER,
            "Monthly Master",
            "Practice 30 days in a row",
            "🗓️",
            BadgeRequirement::DailyStreak { days: 30 },
            BadgeRarity::Legendary,
        ),
        badge(
            CENTURION,
            "Centurion",
            "Complete 100 practice sessions",
            "💯",
            BadgeRequirement::TotalSessions { count: 100 },
            BadgeRarity::Epic,
        ),
    ]
}

/// Whether a requirement holds for these metrics and aggregate progress.
pub fn requirement_met(
    requirement: &BadgeRequirement,
    metrics: &Metrics,
    progress: &Progress,
) -> bool {
    match requirement {
        BadgeRequirement::Metrics { thresholds } => thresholds
            .iter()
            .all(|(key, minimum)| metrics.get(*key) >= *minimum),
        BadgeRequirement::DailyStreak { days } => progress.daily_streak >= *days,
        BadgeRequirement::TotalSessions { count } => progress.total_sessions >= *count,
    }
}
