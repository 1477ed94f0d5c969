use serde::{Deserialize, Serialize};

use crate::models::{Goal, ProgressRecord, SkillLevel};

/// Onboarding state kept in durable storage between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSnapshot {
    #[serde(default)]
    pub selected_goal: Option<Goal>,
    #[serde(default)]
    pub selected_skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub last_progress: Option<ProgressRecord>,
}

impl OnboardingSnapshot {
    pub fn is_empty(&self) -> bool {
        self.selected_goal.is_none() && self.selected_skill_level.is_none() && self.last_progress.is_none()
    }
}
