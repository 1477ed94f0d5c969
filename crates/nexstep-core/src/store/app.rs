//! The `Store`: shared handle over `AppState` plus the action helpers that
//! wrap dispatch with persistence and backend calls.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, Backend};
use crate::auth::{Session, SessionPersistence};
use crate::models::{
    validate_skill_level, Goal, Progress, ProgressRecord, Roadmap, SkillLevel, StartedRoadmap, Toast,
    ToastKind, UserProfile, ValidationMessage,
};
use crate::storage::{Storage, StorageError, ONBOARDING_KEY};

use super::action::reduce;
use super::snapshot::OnboardingSnapshot;
use super::{Action, AppState};

/// Shown when the backend gives no reason for a failed start.
const START_ROADMAP_FALLBACK: &str = "Failed to start roadmap";

struct StoreInner {
    state: watch::Sender<AppState>,
    backend: Arc<dyn Backend>,
    storage: Arc<dyn Storage>,
    session: SessionPersistence,
    /// Most recent progress write, kept for the onboarding snapshot
    last_progress: Mutex<Option<ProgressRecord>>,
}

/// Single source of truth for session and onboarding state.
///
/// Clone is cheap; clones share the same state. Every dispatch is applied
/// atomically and in call order.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

/// Clears the loading flag when dropped, whichever way the action exits.
struct LoadingGuard<'a> {
    store: &'a Store,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(store: &'a Store) -> Self {
        store.dispatch(Action::SetLoading(true));
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::SetLoading(false));
    }
}

impl Store {
    pub fn new(backend: Arc<dyn Backend>, storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            inner: Arc::new(StoreInner {
                state,
                backend,
                session: SessionPersistence::new(storage.clone()),
                storage,
                last_progress: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Read / dispatch / subscribe
    // =========================================================================

    /// Apply one action.
    pub fn dispatch(&self, action: Action) {
        debug!(?action, "Dispatch");
        self.inner.state.send_modify(|state| reduce(state, action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Hydrate from durable storage. Missing or corrupt entries are skipped.
    pub fn restore(&self) {
        match self.inner.session.load() {
            Ok(Some(session)) => {
                info!(user = %session.user.email, "Restored session");
                self.dispatch(Action::Login(session));
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!(error = %e, "Failed to read persisted session"),
        }

        let snapshot = match self.load_onboarding() {
            Some(snapshot) => snapshot,
            None => return,
        };
        // Goal first: selecting it resets the level
        if let Some(goal) = snapshot.selected_goal {
            self.dispatch(Action::SelectGoal(goal));
        }
        if let Some(level) = snapshot.selected_skill_level {
            self.dispatch(Action::SelectSkillLevel(level));
        }
        if let Some(record) = snapshot.last_progress {
            self.dispatch(Action::UpdateUserProgress {
                roadmap_id: record.roadmap_id.clone(),
                progress: record.progress.clone(),
            });
            *self.last_progress() = Some(record);
        }
    }

    fn load_onboarding(&self) -> Option<OnboardingSnapshot> {
        let raw = match self.inner.storage.get_item(ONBOARDING_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read onboarding snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt onboarding snapshot");
                None
            }
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Hold the session and persist it. A failed write only costs persistence.
    pub fn login(&self, user: UserProfile, token: impl Into<String>) {
        let session = Session::new(user, token);
        if let Err(e) = self.inner.session.save(&session) {
            error!(error = %e, "Failed to persist session");
        }
        info!(user = %session.user.email, role = ?session.user.role, "Logged in");
        self.dispatch(Action::Login(session));
    }

    /// Drop the session and its persisted copy. Safe to call repeatedly.
    pub fn logout(&self) {
        self.dispatch(Action::Logout);
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "Failed to remove persisted session");
        }
    }

    // =========================================================================
    // Onboarding selection
    // =========================================================================

    pub fn select_goal(&self, goal: Goal) {
        self.dispatch(Action::SelectGoal(goal));
        self.persist_onboarding();
    }

    pub fn clear_selected_goal(&self) {
        self.dispatch(Action::ClearSelectedGoal);
        self.persist_onboarding();
    }

    pub fn select_skill_level(&self, level: SkillLevel) {
        self.dispatch(Action::SelectSkillLevel(level));
        self.persist_onboarding();
    }

    /// Compare `level` with the selected goal and record the result.
    ///
    /// Does nothing and returns `None` when no goal is selected.
    pub fn validate_skill_level(&self, level: SkillLevel) -> Option<ValidationMessage> {
        let required = self.inner.state.borrow().selected_goal.as_ref()?.required_difficulty;
        let message = validate_skill_level(level, required);
        self.dispatch(Action::SetSkillValidation(message.clone()));
        Some(message)
    }

    pub fn set_skill_validation(&self, message: ValidationMessage) {
        self.dispatch(Action::SetSkillValidation(message));
    }

    pub fn clear_skill_validation(&self) {
        self.dispatch(Action::ClearSkillValidation);
    }

    // =========================================================================
    // UI flags
    // =========================================================================

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(Action::SetLoading(loading));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.dispatch(Action::SetError(message.into()));
    }

    pub fn clear_error(&self) {
        self.dispatch(Action::ClearError);
    }

    pub fn open_roadmap_modal(&self) {
        self.dispatch(Action::OpenRoadmapModal);
    }

    pub fn close_roadmap_modal(&self) {
        self.dispatch(Action::CloseRoadmapModal);
    }

    // =========================================================================
    // Roadmaps and progress
    // =========================================================================

    pub fn set_active_roadmaps(&self, roadmaps: Vec<Roadmap>) {
        self.dispatch(Action::SetActiveRoadmaps(roadmaps));
    }

    /// Start the roadmap for `goal_id` at `skill_level`.
    ///
    /// On success the roadmap and its progress join the store, the modal
    /// closes and the onboarding selection is cleared. On failure the
    /// display message lands in `error`. Concurrent calls are not
    /// deduplicated; each completion is applied as it arrives.
    pub async fn start_roadmap(&self, goal_id: &str, skill_level: SkillLevel) -> Result<StartedRoadmap, ApiError> {
        let _loading = LoadingGuard::acquire(self);
        self.dispatch(Action::ClearError);

        match self.inner.backend.start_roadmap(goal_id, skill_level).await {
            Ok(started) => {
                info!(goal_id, roadmap_id = %started.roadmap.id, level = %skill_level, "Roadmap started");
                self.dispatch(Action::StartRoadmapSuccess(started.clone()));
                self.dispatch(Action::ClearSelectedGoal);
                self.persist_onboarding();
                Ok(started)
            }
            Err(e) => {
                error!(goal_id, error = %e, "Failed to start roadmap");
                self.dispatch(Action::SetError(e.user_message(START_ROADMAP_FALLBACK)));
                Err(e)
            }
        }
    }

    /// Merge progress for one roadmap, then persist it best-effort.
    pub fn update_user_progress(&self, roadmap_id: impl Into<String>, progress: Progress) {
        let roadmap_id = roadmap_id.into();
        self.dispatch(Action::UpdateUserProgress {
            roadmap_id: roadmap_id.clone(),
            progress: progress.clone(),
        });
        *self.last_progress() = Some(ProgressRecord { roadmap_id, progress });
        self.persist_onboarding();
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    /// Show a toast and schedule its removal after `duration`.
    ///
    /// A zero duration, or no running Tokio runtime, leaves the toast in place
    /// until [`dismiss_toast`](Self::dismiss_toast).
    pub fn show_toast(&self, kind: ToastKind, message: impl Into<String>, duration: Duration) -> String {
        let toast = Toast::new(kind, message, duration);
        let id = toast.id.clone();
        let sticky = toast.is_sticky();
        self.dispatch(Action::AddToast(toast));

        if !sticky {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let inner = Arc::downgrade(&self.inner);
                    let toast_id = id.clone();
                    handle.spawn(expire_toast(inner, toast_id, duration));
                }
                Err(_) => debug!(toast = %id, "No runtime to expire toast"),
            }
        }
        id
    }

    pub fn dismiss_toast(&self, id: &str) {
        self.dispatch(Action::RemoveToast(id.to_string()));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn last_progress(&self) -> std::sync::MutexGuard<'_, Option<ProgressRecord>> {
        self.inner
            .last_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist_onboarding(&self) {
        let snapshot = {
            let state = self.inner.state.borrow();
            OnboardingSnapshot {
                selected_goal: state.selected_goal.clone(),
                selected_skill_level: state.selected_skill_level,
                last_progress: self.last_progress().clone(),
            }
        };

        let result = if snapshot.is_empty() {
            self.inner.storage.remove_item(ONBOARDING_KEY)
        } else {
            serde_json::to_string(&snapshot)
                .map_err(StorageError::from)
                .and_then(|json| self.inner.storage.set_item(ONBOARDING_KEY, &json))
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist onboarding state");
        }
    }
}

async fn expire_toast(inner: Weak<StoreInner>, id: String, after: Duration) {
    tokio::time::sleep(after).await;
    if let Some(inner) = inner.upgrade() {
        Store { inner }.dismiss_toast(&id);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, DashboardStats, ProfileUpdate, ProgressStatus, Role, ValidationKind};
    use crate::storage::{MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Starts roadmaps after a per-goal delay; goals starting with "bad"
    /// are rejected with a message.
    #[derive(Default)]
    struct FakeBackend {
        start_calls: AtomicU32,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn login(&self, _email: &str, _password: &str) -> Result<Session, ApiError> {
            Err(ApiError::Unauthorized(None))
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

        async fn start_roadmap(&self, goal_id: &str, _level: SkillLevel) -> Result<StartedRoadmap, ApiError> {
            self.start_calls.fetch_add(1, Ordering::SeqCst);
            let delay = if goal_id.starts_with("slow") { 50 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if goal_id.starts_with("bad") {
                return Err(ApiError::Rejected {
                    status: Some(400),
                    message: "X".to_string(),
                });
            }
            if goal_id.starts_with("silent") {
                return Err(ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>"));
            }
            if goal_id.starts_with("missing") {
                return Err(ApiError::from_status(
                    StatusCode::NOT_FOUND,
                    r#"{"success":false,"message":"Roadmap not found"}"#,
                ));
            }
            if goal_id.starts_with("crash") {
                return Err(ApiError::from_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"success":false,"message":"X"}"#,
                ));
            }
            Ok(StartedRoadmap {
                roadmap: Roadmap {
                    id: format!("r-{}", goal_id),
                    goal_id: goal_id.to_string(),
                    title: None,
                    steps: Vec::new(),
                    created_at: None,
                },
                user_progress: Progress {
                    status: ProgressStatus::InProgress,
                    ..Progress::default()
                },
            })
        }

        async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
            Ok(DashboardStats::default())
        }

        async fn fetch_activities(&self, _limit: u32) -> Result<Vec<Activity>, ApiError> {
            Ok(Vec::new())
        }

        async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
            Err(ApiError::Unauthorized(None))
        }

        async fn update_profile(&self, _update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
            Err(ApiError::Unauthorized(None))
        }
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
            created_at: None,
        }
    }

    fn goal(id: &str, difficulty: SkillLevel) -> Goal {
        Goal {
            id: id.to_string(),
            title: "Web Developer".to_string(),
            required_difficulty: difficulty,
            category: None,
            description: None,
            estimated_time: None,
        }
    }

    fn setup() -> (Arc<FakeBackend>, Arc<MemoryStorage>, Store) {
        let backend = Arc::new(FakeBackend::default());
        let storage = Arc::new(MemoryStorage::new());
        let store = Store::new(backend.clone(), storage.clone());
        (backend, storage, store)
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_persists_session() {
        let (_backend, storage, store) = setup();
        store.login(user(), "tok");

        assert!(store.is_authenticated());
        assert_eq!(store.state().token(), Some("tok"));
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert!(storage.get_item(USER_KEY).unwrap().is_some());
    }

    #[test]
    fn test_login_survives_storage_failure() {
        let store = Store::new(Arc::new(FakeBackend::default()), Arc::new(BrokenStorage));
        store.login(user(), "tok");
        assert!(store.is_authenticated());
        assert_eq!(store.state().user().map(|u| u.name.as_str()), Some("Ada"));
    }

    #[test]
    fn test_logout_clears_and_is_idempotent() {
        let (_backend, storage, store) = setup();
        store.login(user(), "tok");
        store.logout();

        assert!(!store.is_authenticated());
        assert!(storage.get_item(USER_KEY).unwrap().is_none());
        assert!(storage.get_item(TOKEN_KEY).unwrap().is_none());

        let before = store.state();
        store.logout();
        assert_eq!(store.state(), before);
    }

    #[test]
    fn test_logout_when_never_logged_in() {
        let store = Store::new(Arc::new(FakeBackend::default()), Arc::new(BrokenStorage));
        store.logout();
        assert_eq!(store.state(), AppState::default());
    }

    // -------------------------------------------------------------------------
    // Selection and validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_against_selected_goal() {
        let (_backend, _storage, store) = setup();
        assert_eq!(store.validate_skill_level(SkillLevel::Beginner), None);

        store.select_goal(goal("g1", SkillLevel::Intermediate));
        store.select_skill_level(SkillLevel::Beginner);
        let message = store.validate_skill_level(SkillLevel::Beginner).unwrap();
        assert_eq!(message.kind, ValidationKind::Warning);
        assert_eq!(store.state().skill_validation, Some(message));

        let message = store.validate_skill_level(SkillLevel::Advanced).unwrap();
        assert_eq!(message.kind, ValidationKind::Success);

        store.select_goal(goal("g2", SkillLevel::Beginner));
        let state = store.state();
        assert!(state.selected_skill_level.is_none());
        assert!(state.skill_validation.is_none());
    }

    #[test]
    fn test_selection_restored_from_storage() {
        let (backend, storage, store) = setup();
        store.login(user(), "tok");
        store.select_goal(goal("g1", SkillLevel::Advanced));
        store.select_skill_level(SkillLevel::Intermediate);
        store.update_user_progress(
            "r1",
            Progress {
                overall_progress: 40.0,
                ..Progress::default()
            },
        );

        let restored = Store::new(backend, storage);
        restored.restore();
        let state = restored.state();
        assert!(state.is_authenticated());
        assert_eq!(state.selected_goal.map(|g| g.id), Some("g1".to_string()));
        assert_eq!(state.selected_skill_level, Some(SkillLevel::Intermediate));
        assert_eq!(state.user_progress["r1"].overall_progress, 40.0);
    }

    #[test]
    fn test_clearing_selection_removes_snapshot() {
        let (_backend, storage, store) = setup();
        store.select_goal(goal("g1", SkillLevel::Beginner));
        assert!(storage.get_item(ONBOARDING_KEY).unwrap().is_some());

        store.clear_selected_goal();
        assert!(storage.get_item(ONBOARDING_KEY).unwrap().is_none());
    }

    #[test]
    fn test_restore_tolerates_corrupt_entries() {
        let (backend, storage, _store) = setup();
        storage.set_item(USER_KEY, "{broken").unwrap();
        storage.set_item(TOKEN_KEY, "tok").unwrap();
        storage.set_item(ONBOARDING_KEY, "[1, 2").unwrap();

        let store = Store::new(backend, storage.clone());
        store.restore();
        assert_eq!(store.state(), AppState::default());
        assert!(storage.get_item(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_restore_with_broken_storage() {
        let store = Store::new(Arc::new(FakeBackend::default()), Arc::new(BrokenStorage));
        store.restore();
        assert_eq!(store.state(), AppState::default());
    }

    // -------------------------------------------------------------------------
    // Roadmaps
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_start_roadmap_success() {
        let (_backend, _storage, store) = setup();
        store.select_goal(goal("web", SkillLevel::Beginner));
        store.select_skill_level(SkillLevel::Beginner);
        store.open_roadmap_modal();
        store.set_error("old error");

        let started = store.start_roadmap("web", SkillLevel::Beginner).await.unwrap();

        let state = store.state();
        assert_eq!(state.active_roadmaps.len(), 1);
        assert_eq!(state.active_roadmaps[0].id, started.roadmap.id);
        assert!(state.user_progress.contains_key("r-web"));
        assert!(!state.roadmap_modal_open);
        assert!(state.selected_goal.is_none());
        assert!(state.selected_skill_level.is_none());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_start_roadmap_failure_sets_error() {
        let (_backend, _storage, store) = setup();
        store.set_active_roadmaps(Vec::new());
        store.select_goal(goal("bad", SkillLevel::Beginner));

        let result = store.start_roadmap("bad", SkillLevel::Beginner).await;

        assert!(result.is_err());
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("X"));
        assert!(!state.loading);
        assert!(state.active_roadmaps.is_empty());
        // The selection is kept so the user can retry
        assert!(state.selected_goal.is_some());
    }

    #[tokio::test]
    async fn test_start_roadmap_failure_without_message() {
        let (_backend, _storage, store) = setup();
        let _ = store.start_roadmap("silent", SkillLevel::Advanced).await;
        assert_eq!(store.state().error.as_deref(), Some(START_ROADMAP_FALLBACK));
    }

    #[tokio::test]
    async fn test_start_roadmap_surfaces_message_for_any_status() {
        let (_backend, _storage, store) = setup();

        let result = store.start_roadmap("missing", SkillLevel::Beginner).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
        assert_eq!(store.state().error.as_deref(), Some("Roadmap not found"));

        let _ = store.start_roadmap("crash", SkillLevel::Beginner).await;
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("X"));
        assert!(!state.loading);
        assert!(state.active_roadmaps.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_roadmap_sets_loading_while_in_flight() {
        let (_backend, _storage, store) = setup();
        let mut rx = store.subscribe();

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.start_roadmap("slow-web", SkillLevel::Beginner).await })
        };

        rx.wait_for(|s| s.loading).await.unwrap();
        task.await.unwrap().unwrap();
        assert!(!store.state().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_starts_are_not_deduplicated() {
        let (backend, _storage, store) = setup();

        let (slow, fast) = futures::join!(
            store.start_roadmap("slow-a", SkillLevel::Beginner),
            store.start_roadmap("fast-b", SkillLevel::Beginner),
        );
        assert!(slow.is_ok() && fast.is_ok());

        // Both calls reach the backend and both results are applied, in
        // completion order rather than call order.
        assert_eq!(backend.start_calls.load(Ordering::SeqCst), 2);
        let ids: Vec<String> = store.state().active_roadmaps.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r-fast-b".to_string(), "r-slow-a".to_string()]);
        assert!(!store.state().loading);
    }

    #[test]
    fn test_update_progress_survives_storage_failure() {
        let store = Store::new(Arc::new(FakeBackend::default()), Arc::new(BrokenStorage));
        store.update_user_progress("r1", Progress::default());
        store.update_user_progress(
            "r1",
            Progress {
                overall_progress: 75.0,
                ..Progress::default()
            },
        );
        assert_eq!(store.state().user_progress["r1"].overall_progress, 75.0);
    }

    // -------------------------------------------------------------------------
    // Toasts
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let (_backend, _storage, store) = setup();
        let id = store.show_toast(ToastKind::Success, "Saved", Duration::from_millis(20));
        assert_eq!(store.state().toasts.len(), 1);

        let mut rx = store.subscribe();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.toasts.is_empty()))
            .await
            .expect("toast should expire")
            .unwrap();
        assert!(store.state().toasts.iter().all(|t| t.id != id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sticky_toast_needs_dismissal() {
        let (_backend, _storage, store) = setup();
        let id = store.show_toast(ToastKind::Error, "Failed", Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.state().toasts.len(), 1);

        store.dismiss_toast(&id);
        assert!(store.state().toasts.is_empty());
    }

    #[test]
    fn test_toast_without_runtime_stays() {
        let (_backend, _storage, store) = setup();
        store.show_toast(ToastKind::Info, "Hello", Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.state().toasts.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_dispatches() {
        let (_backend, _storage, store) = setup();
        let mut rx = store.subscribe();
        store.open_roadmap_modal();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().roadmap_modal_open);

        store.close_roadmap_modal();
        store.clear_error();
        assert!(!rx.borrow_and_update().roadmap_modal_open);
    }
}
