//! Data models for NexStep entities.
//!
//! This module contains the data structures shared by the store, the cache
//! and the API client:
//!
//! - `UserProfile`, `Role`: the authenticated identity
//! - `Goal`, `SkillLevel`, `ValidationMessage`: onboarding selections
//! - `Roadmap`, `Progress`, `StartedRoadmap`: active roadmaps and progress
//! - `Toast`, `ToastKind`: transient notifications
//! - `DashboardStats`, `Activity`: cached dashboard reads

pub mod dashboard;
pub mod goal;
pub mod roadmap;
pub mod toast;
pub mod user;

pub use dashboard::{Activity, DashboardStats};
pub use goal::{validate_skill_level, Goal, SkillLevel, ValidationKind, ValidationMessage};
pub use roadmap::{Progress, ProgressRecord, ProgressStatus, Roadmap, RoadmapStep, StartedRoadmap, StepProgress};
pub use toast::{Toast, ToastKind, DEFAULT_TOAST_DURATION};
pub use user::{ProfileUpdate, Role, UserProfile};
