//! Cache lifetimes for the different kinds of backend data.

use std::time::Duration;

pub const USER_PROFILE: Duration = Duration::from_secs(10 * 60);
pub const DASHBOARD_STATS: Duration = Duration::from_secs(2 * 60);
pub const NOTIFICATIONS: Duration = Duration::from_secs(60);
pub const ACTIVITIES: Duration = Duration::from_secs(5 * 60);
pub const ROADMAPS: Duration = Duration::from_secs(15 * 60);
pub const PROGRESS: Duration = Duration::from_secs(30);
pub const GOALS: Duration = Duration::from_secs(30 * 60);
pub const RESOURCES: Duration = Duration::from_secs(60 * 60);
