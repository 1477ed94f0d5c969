//! Session and onboarding state management.
//!
//! `Store` owns a single `AppState` and changes it only through `Action`s
//! applied by one reducer. Helper methods wrap dispatch with the side effects
//! a transition needs: durable persistence of the session and onboarding
//! selection, backend calls, and toast expiry.
//!
//! State survives restarts through three storage keys: the user profile, the
//! token, and the onboarding snapshot (selected goal, skill level, last
//! progress write).

pub mod action;
pub mod app;
pub mod snapshot;
pub mod state;

pub use action::{reduce, Action};
pub use app::Store;
pub use snapshot::OnboardingSnapshot;
pub use state::AppState;
