use std::collections::HashMap;

use serde::Serialize;

use crate::auth::Session;
use crate::models::{Goal, Progress, Roadmap, SkillLevel, Toast, UserProfile, ValidationMessage};

/// Everything the front end renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    // Session
    pub session: Option<Session>,

    // Onboarding selection
    pub selected_goal: Option<Goal>,
    pub selected_skill_level: Option<SkillLevel>,
    pub skill_validation: Option<ValidationMessage>,

    // Roadmaps, progress keyed by roadmap id
    pub active_roadmaps: Vec<Roadmap>,
    pub user_progress: HashMap<String, Progress>,

    // UI state
    pub roadmap_modal_open: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub toasts: Vec<Toast>,
}

impl AppState {
    /// True iff both a profile and a token are held.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn progress_for(&self, roadmap_id: &str) -> Option<&Progress> {
        self.user_progress.get(roadmap_id)
    }
}
