//! Career goals, skill levels and the skill-level validation rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MEETS_REQUIREMENT_TEXT: &str = "Your skill level meets the requirements for this goal";

const BELOW_REQUIREMENT_TEXT: &str = "Your current skill level is below the recommended level for this goal. Proceeding may require additional effort.";

/// Self-reported experience level, ordered beginner < intermediate < advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl SkillLevel {
    /// Ordinal rank used when comparing against a goal's difficulty.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
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
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!("Unknown skill level: {}", other)),
        }
    }
}

/// A career or learning objective the user can pick during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(rename = "difficulty")]
    pub required_difficulty: SkillLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    Success,
    Warning,
}

/// Feedback shown after the user picks a skill level for the selected goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub text: String,
    pub kind: ValidationKind,
}

impl ValidationMessage {
    pub fn is_success(&self) -> bool {
        self.kind == ValidationKind::Success
    }
}

/// Compare a chosen level against a goal's required difficulty.
pub fn validate_skill_level(user_level: SkillLevel, required: SkillLevel) -> ValidationMessage {
    if user_level.rank() >= required.rank() {
        ValidationMessage {
            text: MEETS_REQUIREMENT_TEXT.to_string(),
            kind: ValidationKind::Success,
        }
    } else {
        ValidationMessage {
            text: BELOW_REQUIREMENT_TEXT.to_string(),
            kind: ValidationKind::Warning,
        }
    }
}
