//! User-facing notifications
//!
//! Every state-changing session action reports exactly one transient
//! [`Notification`]. Hosts decide how to show them by supplying a
//! [`Notifier`].

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Action succeeded
    Success,
    /// Action failed and was recovered
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub severity: Severity,
    /// Message text
    pub message: String,
    /// When it was raised
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Create success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Success, message)
    }

    /// Create error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Check severity
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Sink for session notifications
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Deliver a notification
    fn notify(&self, notification: Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => tracing::info!(text = %notification.message, "notification"),
            Severity::Error => tracing::error!(text = %notification.message, "notification"),
        }
    }
}

/// Records notifications in order
///
/// Also forwards each one to tracing, so a log can stand in for
/// [`TracingNotifier`].
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded notifications
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// Most recent notification
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().last().cloned()
    }

    /// Number of recorded notifications
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return all recorded notifications
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        self.entries.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_in_order() {
        let log = NotificationLog::new();
        log.notify(Notification::success("one"));
        log.notify(Notification::error("two"));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "one");
        assert!(entries[1].is_error());
        assert_eq!(log.last().map(|n| n.message), Some("two".to_string()));
    }

    #[test]
    fn drain_empties_log() {
        let log = NotificationLog::new();
        log.notify(Notification::success("x"));
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn display_shows_severity() {
        assert_eq!(Notification::error("boom").to_string(), "[error] boom");
    }
}
