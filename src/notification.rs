//! Notifications for displaying success and error messages to users.
//!
//! Every user action ends in exactly one notification. The sink that shows
//! them is an external collaborator; [ConsoleNotifier] is a plain terminal
//! implementation.

use std::io::Write;

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The action completed.
    Success,
    /// The action failed.
    Error,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The headline, e.g. "Success!".
    pub title: String,
    /// The detail text.
    pub description: String,
    /// How the notification should be styled.
    pub severity: Severity,
}

impl Notification {
    /// Create a new success notification.
    pub fn success(title: &str, description: &str) -> Self {
        Self::new(title, description, Severity::Success)
    }

    /// Create a new error notification.
    pub fn error(title: &str, description: &str) -> Self {
        Self::new(title, description, Severity::Error)
    }

    fn new(title: &str, description: &str, severity: Severity) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            severity,
        }
    }
}

/// Somewhere to show notifications to the user.
///
/// Fire and forget: there is no way to know whether the user saw it.
pub trait NotificationSink: Send + Sync {
    /// Show `notification` to the user.
    fn notify(&self, notification: Notification);
}

/// Prints notifications to stdout, or stderr for errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            title = %notification.title,
            severity = ?notification.severity,
            "{}",
            notification.description
        );

        let line = format!("{}: {}", notification.title, notification.description);

        // A closed pipe is not worth failing the action over.
        let _ = match notification.severity {
            Severity::Error => writeln!(std::io::stderr(), "{line}"),
            Severity::Success => writeln!(std::io::stdout(), "{line}"),
        };
    }
}
