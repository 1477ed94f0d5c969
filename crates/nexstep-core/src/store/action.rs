//! Store transitions and the reducer that applies them.

use crate::auth::Session;
use crate::models::{Goal, Progress, Roadmap, SkillLevel, StartedRoadmap, Toast, ValidationMessage};

use super::AppState;

/// One variant per state transition, each carrying only its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hold an authenticated session
    Login(Session),
    /// Drop the session
    Logout,
    SetLoading(bool),
    /// Record a display error; also ends any loading
    SetError(String),
    ClearError,
    /// Pick a goal; resets the level and validation chosen for the previous one
    SelectGoal(Goal),
    ClearSelectedGoal,
    SelectSkillLevel(SkillLevel),
    SetSkillValidation(ValidationMessage),
    ClearSkillValidation,
    OpenRoadmapModal,
    CloseRoadmapModal,
    SetActiveRoadmaps(Vec<Roadmap>),
    /// Merge progress for one roadmap; last write wins
    UpdateUserProgress { roadmap_id: String, progress: Progress },
    /// A roadmap was started by the backend
    StartRoadmapSuccess(StartedRoadmap),
    AddToast(Toast),
    RemoveToast(String),
}

/// Apply `action` to `state`.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Login(session) => {
            state.session = Some(session);
        }
        Action::Logout => {
            state.session = None;
        }
        Action::SetLoading(loading) => {
            state.loading = loading;
        }
        Action::SetError(message) => {
            state.error = Some(message);
            state.loading = false;
        }
        Action::ClearError => {
            state.error = None;
        }
        Action::SelectGoal(goal) => {
            state.selected_goal = Some(goal);
            state.selected_skill_level = None;
            state.skill_validation = None;
        }
        Action::ClearSelectedGoal => {
            state.selected_goal = None;
            state.selected_skill_level = None;
            state.skill_validation = None;
        }
        Action::SelectSkillLevel(level) => {
            state.selected_skill_level = Some(level);
        }
        Action::SetSkillValidation(message) => {
            state.skill_validation = Some(message);
        }
        Action::ClearSkillValidation => {
            state.skill_validation = None;
        }
        Action::OpenRoadmapModal => {
            state.roadmap_modal_open = true;
        }
        Action::CloseRoadmapModal => {
            state.roadmap_modal_open = false;
        }
        Action::SetActiveRoadmaps(roadmaps) => {
            state.active_roadmaps = roadmaps;
        }
        Action::UpdateUserProgress { roadmap_id, progress } => {
            state.user_progress.insert(roadmap_id, progress);
        }
        Action::StartRoadmapSuccess(started) => {
            let StartedRoadmap { roadmap, user_progress } = started;
            state.user_progress.insert(roadmap.id.clone(), user_progress);
            state.active_roadmaps.push(roadmap);
            state.roadmap_modal_open = false;
        }
        Action::AddToast(toast) => {
            state.toasts.push(toast);
        }
        Action::RemoveToast(id) => {
            state.toasts.retain(|t| t.id != id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
