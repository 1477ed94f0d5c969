//! Transient notifications surfaced by store actions.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Toasts disappear after 5 seconds unless told otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    /// Zero keeps the toast until it is dismissed.
    pub duration: Duration,
}

impl Toast {
    /// Build a toast with a freshly generated id.
    pub fn new(kind: ToastKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: Self::generate_id(),
            kind,
            message: message.into(),
            duration,
        }
    }

    /// Millisecond timestamp plus a random suffix, unique for practical purposes.
    fn generate_id() -> String {
        format!("{}-{:08x}", Utc::now().timestamp_millis(), rand::random::<u32>())
    }

    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }
}
