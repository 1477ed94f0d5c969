//! Cache-wrapped backend reads used by the dashboard and profile views.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{ttl, CacheManager, CallOptions, Cached};
use crate::models::{Activity, DashboardStats, Goal, ProfileUpdate, UserProfile};

use super::{ApiError, Backend};

const DASHBOARD_STATS: &str = "dashboard_stats";
const DASHBOARD_ACTIVITIES: &str = "dashboard_activities";
const USER_PROFILE: &str = "user_profile";
const GOALS: &str = "goals";

/// Keys of everything the dashboard shows; cleared when the profile changes.
const DASHBOARD_PATTERN: &str = "^dashboard_";

/// Backend reads memoized through a [`CacheManager`].
#[derive(Clone)]
pub struct CachedApi {
    backend: Arc<dyn Backend>,
    cache: CacheManager,
}

impl CachedApi {
    pub fn new(backend: Arc<dyn Backend>, cache: CacheManager) -> Self {
        Self { backend, cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub async fn dashboard_stats(&self, force_refresh: bool) -> Result<Cached<DashboardStats>, ApiError> {
        let options = CallOptions::with_ttl(ttl::DASHBOARD_STATS).force_refresh(force_refresh);
        self.cache
            .cached_call_with_status(DASHBOARD_STATS, &(), options, || self.backend.fetch_dashboard_stats())
            .await
    }

    pub async fn activities(&self, limit: u32, force_refresh: bool) -> Result<Cached<Vec<Activity>>, ApiError> {
        let options = CallOptions::with_ttl(ttl::ACTIVITIES).force_refresh(force_refresh);
        self.cache
            .cached_call_with_status(DASHBOARD_ACTIVITIES, &limit, options, || {
                self.backend.fetch_activities(limit)
            })
            .await
    }

    pub async fn profile(&self, force_refresh: bool) -> Result<Cached<UserProfile>, ApiError> {
        let options = CallOptions::with_ttl(ttl::USER_PROFILE).force_refresh(force_refresh);
        self.cache
            .cached_call_with_status(USER_PROFILE, &(), options, || self.backend.fetch_profile())
            .await
    }

    pub async fn goals(&self, force_refresh: bool) -> Result<Cached<Vec<Goal>>, ApiError> {
        let options = CallOptions::with_ttl(ttl::GOALS).force_refresh(force_refresh);
        self.cache
            .cached_call_with_status(GOALS, &(), options, || self.backend.fetch_goals())
            .await
    }

    /// Update the profile, then drop the cached profile and dashboard reads.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let profile = self.backend.update_profile(update).await?;
        self.cache.delete(&CacheManager::key(USER_PROFILE, &()));
        let removed = self.cache.invalidate_pattern(DASHBOARD_PATTERN);
        debug!(removed, "Invalidated dashboard cache after profile update");
        Ok(profile)
    }

    /// Warm the dashboard entries ahead of the first read.
    pub async fn preload_dashboard(&self) -> Result<(), ApiError> {
        let stats = self.cache.preload(DASHBOARD_STATS, &(), ttl::DASHBOARD_STATS, || {
            self.backend.fetch_dashboard_stats()
        });
        let profile = self
            .cache
            .preload(USER_PROFILE, &(), ttl::USER_PROFILE, || self.backend.fetch_profile());
        futures::try_join!(stats, profile)?;
        info!("Dashboard cache preloaded");
        Ok(())
    }

    /// Age of the cached dashboard stats, for status display.
    pub fn dashboard_age(&self) -> Option<String> {
        self.cache.age_display(&CacheManager::key(DASHBOARD_STATS, &()))
    }

    /// Forget everything cached for the current user.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::models::{Role, SkillLevel, StartedRoadmap};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingBackend {
        stats_calls: AtomicU32,
        profile_calls: AtomicU32,
        failing: AtomicBool,
    }

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: name.to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
            created_at: None,
        }
    }

    #[async_trait]
    impl Backend for CountingBackend {
        async fn login(&self, _email: &str, _password: &str) -> Result<Session, ApiError> {
            unimplemented!()
        }

        async fn fetch_goals(&self) -> Result<Vec<Goal>, ApiError> {
            Ok(Vec::new())
        }

        async fn fetch_goal(&self, goal_id: &str) -> Result<Goal, ApiError> {
            Err(ApiError::NotFound {
                detail: goal_id.to_string(),
                message: None,
            })
        }

        async fn start_roadmap(&self, _goal_id: &str, _level: SkillLevel) -> Result<StartedRoadmap, ApiError> {
            unimplemented!()
        }

        async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ApiError::ServerError {
                    detail: "down".to_string(),
                    message: None,
                });
            }
            let n = self.stats_calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(DashboardStats {
                total_roadmaps: n,
                ..DashboardStats::default()
            })
        }

        async fn fetch_activities(&self, limit: u32) -> Result<Vec<Activity>, ApiError> {
            Ok((0..limit)
                .map(|i| Activity {
                    id: i.to_string(),
                    activity_type: "login".to_string(),
                    title: "Logged in".to_string(),
                    description: None,
                    created_at: None,
                })
                .collect())
        }

        async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            Ok(profile("Ada"))
        }

        async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
            Ok(profile(update.name.as_deref().unwrap_or("Ada")))
        }
    }

    fn setup() -> (Arc<CountingBackend>, CachedApi) {
        let backend = Arc::new(CountingBackend::default());
        let api = CachedApi::new(backend.clone(), CacheManager::new());
        (backend, api)
    }

    #[tokio::test]
    async fn test_dashboard_stats_are_memoized() {
        let (backend, api) = setup();
        let first = api.dashboard_stats(false).await.unwrap();
        let second = api.dashboard_stats(false).await.unwrap();
        assert_eq!(first.data.total_roadmaps, 1);
        assert_eq!(second.data.total_roadmaps, 1);
        assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 1);

        let refreshed = api.dashboard_stats(true).await.unwrap();
        assert_eq!(refreshed.data.total_roadmaps, 2);
        assert_eq!(api.dashboard_age().as_deref(), Some("just now"));
    }

    #[tokio::test]
    async fn test_stale_stats_when_backend_fails() {
        let (backend, api) = setup();
        api.dashboard_stats(false).await.unwrap();
        backend.failing.store(true, Ordering::SeqCst);

        let stale = api.dashboard_stats(true).await.unwrap();
        assert!(stale.stale);
        assert_eq!(stale.data.total_roadmaps, 1);
    }

    #[tokio::test]
    async fn test_activities_keyed_by_limit() {
        let (_backend, api) = setup();
        assert_eq!(api.activities(2, false).await.unwrap().data.len(), 2);
        assert_eq!(api.activities(5, false).await.unwrap().data.len(), 5);
        assert_eq!(api.cache().stats().total, 2);
    }

    #[tokio::test]
    async fn test_profile_update_invalidates_profile_and_dashboard() {
        let (backend, api) = setup();
        api.profile(false).await.unwrap();
        api.dashboard_stats(false).await.unwrap();
        api.activities(3, false).await.unwrap();
        api.goals(false).await.unwrap();
        assert_eq!(api.cache().stats().total, 4);

        let update = ProfileUpdate {
            name: Some("Grace".to_string()),
            email: None,
        };
        let updated = api.update_profile(&update).await.unwrap();
        assert_eq!(updated.name, "Grace");
        // Only the goals entry survives
        assert_eq!(api.cache().stats().total, 1);

        api.profile(false).await.unwrap();
        assert_eq!(backend.profile_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preload_dashboard() {
        let (backend, api) = setup();
        api.preload_dashboard().await.unwrap();
        assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 1);

        api.dashboard_stats(false).await.unwrap();
        api.profile(false).await.unwrap();
        assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.profile_calls.load(Ordering::SeqCst), 1);
    }
}
