//! Route changes requested by the application, e.g. after logging out.

/// Moves the user to another view.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`, one of the paths in the `endpoints` module.
    fn go_to(&self, path: &str);
}

/// Logs route changes. For front ends without routing, such as the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go_to(&self, path: &str) {
        tracing::info!("Navigating to {path}");
    }
}
