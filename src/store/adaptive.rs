//! Interaction affordances tuned to each skill level.

use crate::core::skill::SkillLevel;
use serde::{Deserialize, Serialize};

/// Adaptive UI parameters. Sizes are in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveUiConfig {
    pub button_size: u32,
    pub click_padding: u32,
    /// Multiplier applied to drag deltas; lower is more forgiving
    pub drag_sensitivity: f64,
    pub show_visual_hints: bool,
    pub enable_haptic_feedback: bool,
    pub snap_to_grid: bool,
    pub show_trajectory: bool,
}

impl AdaptiveUiConfig {
    pub fn for_level(level: SkillLevel) -> Self {
        match level {
            SkillLevel::Beginner => Self {
                button_size: 64,
                click_padding: 16,
                drag_sensitivity: 0.5,
                show_visual_hints: true,
                enable_haptic_feedback: true,
                snap_to_grid: true,
                show_trajectory: true,
            },
            SkillLevel::Intermediate => Self {
                button_size: 52,
                click_padding: 12,
                drag_sensitivity: 0.7,
                show_visual_hints: true,
                enable_haptic_feedback: true,
                snap_to_grid: true,
                show_trajectory: false,
            },
            SkillLevel::Advanced => Self {
                button_size: 44,
                click_padding: 8,
                drag_sensitivity: 0.85,
                show_visual_hints: false,
                enable_haptic_feedback: true,
                snap_to_grid: false,
                show_trajectory: false,
            },
            SkillLevel::Expert => Self {
                button_size: 36,
                click_padding: 4,
                drag_sensitivity: 1.0,
                show_visual_hints: false,
                enable_haptic_feedback: false,
                snap_to_grid: false,
                show_trajectory: false,
            },
        }
    }
}
