use super::guard::{GuardDecision, RouteGuard};
use super::navigator::{DEFAULT_PATH, Location, Navigator, POST_LOGIN_PATH};
use super::route::Route;
use crate::auth::SessionStore;
use crate::events::SessionEvent;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    /// Protected view whose session is still resolving
    Pending(Route),
    Redirected(Location),
}

/// Applies the route table and the guard to every navigation and records
/// the result with the navigator.
pub struct AppRouter {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AppRouter {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        self.go(path, false)
    }

    /// Evaluate `path` again in place, e.g. after a login or logout event
    pub fn reevaluate(&self, path: &str) -> Navigation {
        self.go(path, true)
    }

    /// Wait for the session to resolve, then navigate
    pub async fn navigate_when_ready(&self, path: &str) -> Navigation {
        self.session.initialize().await;
        self.navigate(path)
    }

    /// Re-run the guard for `current_path` if `event` can change its outcome
    pub fn on_session_event(&self, event: &SessionEvent, current_path: &str) -> Option<Navigation> {
        match event {
            // Same user and role
            SessionEvent::Refreshed => None,
            SessionEvent::LoggedIn(_)
            | SessionEvent::Restored(_)
            | SessionEvent::LoggedOut
            | SessionEvent::Expired => Some(self.reevaluate(current_path)),
        }
    }

    /// Wait for the next session change that affects `current_path` and
    /// apply it. Returns `None` once the session is dropped.
    pub async fn follow_session(
        &self,
        events: &mut broadcast::Receiver<SessionEvent>,
        current_path: &str,
    ) -> Option<Navigation> {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(navigation) = self.on_session_event(&event, current_path) {
                        return Some(navigation);
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Missed {} session events, re-evaluating {}", missed, current_path);
                    return Some(self.reevaluate(current_path));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Continue to the remembered destination after a successful login
    pub fn after_login(&self, from: Option<&str>) -> Navigation {
        self.go(from.unwrap_or(POST_LOGIN_PATH), true)
    }

    /// Sign out and show the login view
    pub fn logout(&self) -> Navigation {
        self.session.logout();
        let location = Location::login();
        self.navigator.navigate(location.clone(), false);
        Navigation::Redirected(location)
    }

    fn go(&self, path: &str, replace: bool) -> Navigation {
        let Some(route) = Route::parse(path) else {
            debug!("No route matches {}, redirecting to {}", path, DEFAULT_PATH);
            return self.redirect(Location::new(DEFAULT_PATH));
        };

        let Some(rule) = route.access_rule() else {
            self.navigator.navigate(Location::new(path), replace);
            return Navigation::Render(route);
        };

        match RouteGuard::new(rule).decide(&self.session.status(), path) {
            GuardDecision::Placeholder => {
                self.navigator.navigate(Location::new(path), replace);
                Navigation::Pending(route)
            }
            GuardDecision::Render => {
                self.navigator.navigate(Location::new(path), replace);
                Navigation::Render(route)
            }
            GuardDecision::RedirectToLogin { from } => self.redirect(Location::login_from(from)),
            GuardDecision::RedirectToDefault => self.redirect(Location::new(DEFAULT_PATH)),
        }
    }

    fn redirect(&self, location: Location) -> Navigation {
        self.navigator.navigate(location.clone(), true);
        Navigation::Redirected(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, SessionContext};
    use crate::http::ApiClient;
    use crate::routing::MemoryHistory;
    use serde_json::json;
    use shared::config::Config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router(server: &MockServer) -> (AppRouter, Arc<SessionStore>, Arc<MemoryHistory>) {
        let context = Arc::new(SessionContext::open(Arc::new(MemoryStore::new())).unwrap());
        let history = Arc::new(MemoryHistory::starting_at("/"));
        let config = Config::new(format!("{}/api", server.uri()));
        let client = ApiClient::new(config, context, history.clone()).unwrap();
        let session = Arc::new(SessionStore::new(client));
        (
            AppRouter::new(session.clone(), history.clone()),
            session,
            history,
        )
    }

    async fn mount_login(server: &MockServer, role: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "a1",
                "refresh": "r1",
                "user": {"id": 5, "name": "Asha", "email": "a@b.com", "role": role}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_protected_route_pending_until_initialized() {
        let server = MockServer::start().await;
        let (router, _, history) = router(&server);

        assert_eq!(router.navigate("/apply"), Navigation::Pending(Route::Apply));
        assert_eq!(history.current().unwrap().path, "/apply");

        assert_eq!(
            router.navigate_when_ready("/apply").await,
            Navigation::Redirected(Location::login_from("/apply"))
        );
    }

    #[tokio::test]
    async fn test_unmatched_path_redirects_home() {
        let server = MockServer::start().await;
        let (router, _, history) = router(&server);

        assert_eq!(
            router.navigate("/nowhere/at/all"),
            Navigation::Redirected(Location::new("/"))
        );
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_public_routes_render_for_anyone() {
        let server = MockServer::start().await;
        let (router, session, _) = router(&server);
        session.initialize().await;

        assert_eq!(
            router.navigate("/restaurants/3"),
            Navigation::Render(Route::RestaurantDetail { id: 3 })
        );
        assert_eq!(router.navigate("/dashboard"), Navigation::Render(Route::Dashboard));
    }

    #[tokio::test]
    async fn test_login_returns_to_remembered_destination() {
        let server = MockServer::start().await;
        mount_login(&server, "USER").await;
        let (router, session, history) = router(&server);
        session.initialize().await;

        let Navigation::Redirected(location) = router.navigate("/application-status") else {
            panic!("expected a redirect to login");
        };
        assert!(location.is_login());

        session.login("a@b.com", "secret123").await.unwrap();
        assert_eq!(
            router.after_login(location.from.as_deref()),
            Navigation::Render(Route::ApplicationStatus)
        );
        assert_eq!(history.current().unwrap().path, "/application-status");
    }

    #[tokio::test]
    async fn test_login_without_destination_lands_on_dashboard() {
        let server = MockServer::start().await;
        mount_login(&server, "OWNER").await;
        let (router, session, _) = router(&server);
        session.initialize().await;

        session.login("a@b.com", "secret123").await.unwrap();
        assert_eq!(router.after_login(None), Navigation::Render(Route::Dashboard));
        assert_eq!(
            router.navigate("/owner-dashboard/edit"),
            Navigation::Render(Route::OwnerRestaurantEdit)
        );
    }

    #[tokio::test]
    async fn test_wrong_role_is_sent_to_default_view() {
        let server = MockServer::start().await;
        mount_login(&server, "USER").await;
        let (router, session, history) = router(&server);
        session.initialize().await;
        session.login("a@b.com", "secret123").await.unwrap();

        assert_eq!(
            router.navigate("/admin/applications"),
            Navigation::Redirected(Location::new("/"))
        );
        assert!(!history.current().unwrap().is_login());
    }

    #[tokio::test]
    async fn test_session_events_reevaluate_open_view() {
        let server = MockServer::start().await;
        mount_login(&server, "USER").await;
        let (router, session, _) = router(&server);
        session.initialize().await;
        let mut events = session.subscribe();

        let Navigation::Redirected(_) = router.navigate("/apply") else {
            panic!("expected a redirect to login");
        };

        session.login("a@b.com", "secret123").await.unwrap();
        assert_eq!(
            router.follow_session(&mut events, "/apply").await,
            Some(Navigation::Render(Route::Apply))
        );

        assert_eq!(router.on_session_event(&SessionEvent::Refreshed, "/apply"), None);

        session.logout();
        assert_eq!(
            router.follow_session(&mut events, "/apply").await,
            Some(Navigation::Redirected(Location::login_from("/apply")))
        );
    }

    #[tokio::test]
    async fn test_logout_reevaluates_as_anonymous() {
        let server = MockServer::start().await;
        mount_login(&server, "OWNER").await;
        let (router, session, history) = router(&server);
        session.initialize().await;
        session.login("a@b.com", "secret123").await.unwrap();
        assert_eq!(
            router.navigate("/owner-dashboard"),
            Navigation::Render(Route::OwnerDashboard)
        );

        router.logout();
        assert_eq!(history.current().unwrap(), Location::login());
        assert_eq!(
            router.reevaluate("/owner-dashboard"),
            Navigation::Redirected(Location::login_from("/owner-dashboard"))
        );
    }
}
