//! Signs the user out and sends them to the log-in page.

use crate::{
    Action, auth::IdentityProvider, endpoints, navigation::Navigator,
    notification::{Notification, NotificationSink},
};

/// Sign the current user out with `provider`.
///
/// On success the user is told and sent to the log-in page. On failure the
/// user sees the provider's error message and stays where they are.
///
/// The local transaction store is left alone; it is cleared when the
/// session observer reports that nobody is signed in.
pub async fn log_out(
    provider: &dyn IdentityProvider,
    notifier: &dyn NotificationSink,
    navigator: &dyn Navigator,
) -> bool {
    match provider.sign_out().await {
        Ok(()) => {
            notifier.notify(Notification::success("Logged out", "See you soon!"));
            navigator.go_to(endpoints::LOG_IN_VIEW);
            true
        }
        Err(error) => {
            tracing::error!("Could not log out: {error}");
            notifier.notify(error.into_notification(Action::LogOut));
            false
        }
    }
}
