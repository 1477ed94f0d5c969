use async_trait::async_trait;

use crate::auth::Session;
use crate::models::{Activity, DashboardStats, Goal, ProfileUpdate, SkillLevel, StartedRoadmap, UserProfile};

use super::ApiError;

/// The backend operations the store and cache depend on.
///
/// `ApiClient` is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    async fn fetch_goals(&self) -> Result<Vec<Goal>, ApiError>;

    async fn fetch_goal(&self, goal_id: &str) -> Result<Goal, ApiError>;

    /// Start the roadmap for a goal at the given level and return it with
    /// its initial progress.
    async fn start_roadmap(&self, goal_id: &str, skill_level: SkillLevel) -> Result<StartedRoadmap, ApiError>;

    async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError>;

    async fn fetch_activities(&self, limit: u32) -> Result<Vec<Activity>, ApiError>;

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError>;
}
