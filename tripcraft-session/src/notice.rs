use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown to the user when a submission settles.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn planning_started() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success! Your journey is being planned.".to_string(),
            description: "Your personalized itinerary will arrive in your inbox shortly.".to_string(),
        }
    }

    pub fn submission_failed() -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Something went wrong.".to_string(),
            description: "There was a problem with your request. Please try again.".to_string(),
        }
    }
}

/// Displays notices; dismissal and expiry are up to the implementation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => info!("{} {}", notice.title, notice.description),
            NoticeKind::Error => warn!("{} {}", notice.title, notice.description),
        }
    }
}
