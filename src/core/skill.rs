//! Skill levels, live classification, and the per-age criteria table.

use crate::core::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered skill tier. `Beginner < Intermediate < Advanced < Expert`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Minimum average score and speed for a tier in the live classification.
struct Tier {
    level: SkillLevel,
    min_average: f64,
    min_speed: f64,
}

/// Highest tier first.
const CLASSIFICATION_TIERS: [Tier; 3] = [
    Tier {
        level: SkillLevel::Expert,
        min_average: 90.0,
        min_speed: 300.0,
    },
    Tier {
        level: SkillLevel::Advanced,
        min_average: 75.0,
        min_speed: 200.0,
    },
    Tier {
        level: SkillLevel::Intermediate,
        min_average: 60.0,
        min_speed: 150.0,
    },
];

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    /// Classify metrics against the fixed tier table.
    ///
    /// A tier requires both the accuracy/smoothness/drag-control average and
    /// the speed to meet its minimums; otherwise the next lower tier is tried.
    pub fn classify(metrics: &Metrics) -> Self {
        let average = (metrics.accuracy + metrics.smoothness + metrics.drag_control) / 3.0;

        CLASSIFICATION_TIERS
            .iter()
            .find(|tier| average >= tier.min_average && metrics.speed >= tier.min_speed)
            .map(|tier| tier.level)
            .unwrap_or(SkillLevel::Beginner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown skill level: {s}"))
    }
}

/// Age bucket used to pick skill criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "6-8")]
    SixToEight,
    #[default]
    #[serde(rename = "9-11")]
    NineToEleven,
    #[serde(rename = "12-14")]
    TwelveToFourteen,
    #[serde(rename = "15+")]
    FifteenPlus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::SixToEight,
        AgeGroup::NineToEleven,
        AgeGroup::TwelveToFourteen,
        AgeGroup::FifteenPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::SixToEight => "6-8",
            AgeGroup::NineToEleven => "9-11",
            AgeGroup::TwelveToFourteen => "12-14",
            AgeGroup::FifteenPlus => "15+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s.trim())
            .ok_or_else(|| format!("unknown age group: {s} (expected 6-8, 9-11, 12-14 or 15+)"))
    }
}

/// Minimum accuracy, speed and smoothness for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillThresholds {
    pub accuracy: f64,
    pub speed: f64,
    pub smoothness: f64,
}

const fn thresholds(accuracy: f64, speed: f64, smoothness: f64) -> SkillThresholds {
    SkillThresholds {
        accuracy,
        speed,
        smoothness,
    }
}

/// Threshold tuples for each tier within one age group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillCriteria {
    pub beginner: SkillThresholds,
    pub intermediate: SkillThresholds,
    pub advanced: SkillThresholds,
    pub expert: SkillThresholds,
}

impl SkillCriteria {
    /// Static criteria table entry for an age group.
    pub fn for_age_group(age_group: AgeGroup) -> Self {
        match age_group {
            AgeGroup::SixToEight => SkillCriteria {
                beginner: thresholds(40.0, 50.0, 40.0),
                intermediate: thresholds(60.0, 100.0, 55.0),
                advanced: thresholds(75.0, 150.0, 70.0),
                expert: thresholds(85.0, 200.0, 80.0),
            },
            AgeGroup::NineToEleven => SkillCriteria {
                beginner: thresholds(50.0, 80.0, 50.0),
                intermediate: thresholds(65.0, 150.0, 65.0),
                advanced: thresholds(80.0, 200.0, 75.0),
                expert: thresholds(90.0, 300.0, 85.0),
            },
            AgeGroup::TwelveToFourteen => SkillCriteria {
                beginner: thresholds(55.0, 100.0, 55.0),
                intermediate: thresholds(70.0, 180.0, 70.0),
                advanced: thresholds(85.0, 250.0, 80.0),
                expert: thresholds(92.0, 350.0, 88.0),
            },
            AgeGroup::FifteenPlus => SkillCriteria {
                beginner: thresholds(60.0, 120.0, 60.0),
                intermediate: thresholds(75.0, 200.0, 75.0),
                advanced: thresholds(88.0, 300.0, 85.0),
                expert: thresholds(95.0, 400.0, 90.0),
            },
        }
    }

    pub fn for_level(&self, level: SkillLevel) -> SkillThresholds {
        match level {
            SkillLevel::Beginner => self.beginner,
            SkillLevel::Intermediate => self.intermediate,
            SkillLevel::Advanced => self.advanced,
            SkillLevel::Expert => self.expert,
        }
    }
}
