//! Dashboard statistics and activity feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregated progress numbers shown on the user dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_roadmaps: u32,
    #[serde(default)]
    pub completed_roadmaps: u32,
    #[serde(default)]
    pub in_progress_roadmaps: u32,
    /// Minutes.
    #[serde(default)]
    pub total_time_spent: u64,
    #[serde(default)]
    pub average_progress: f64,
    #[serde(default)]
    pub recent_activities: Vec<Activity>,
}

impl DashboardStats {
    /// Completed share of all started roadmaps, as a whole percentage.
    pub fn completion_rate(&self) -> u32 {
        if self.total_roadmaps == 0 {
            0
        } else {
            self.completed_roadmaps * 100 / self.total_roadmaps
        }
    }
}
