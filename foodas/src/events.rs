use shared_http::api::User;

/// Session lifecycle notifications, broadcast so that open views can
/// re-evaluate their route guards.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A login stored a new token pair
    LoggedIn(User),
    /// Startup validation resolved the persisted session
    Restored(User),
    LoggedOut,
    /// The access token was renewed with the refresh token
    Refreshed,
    /// Refresh failed; the session was torn down
    Expired,
}
