//! The view paths the application navigates between.

/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/login";
