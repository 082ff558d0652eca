use crate::auth::SessionStatus;
use shared_http::api::Role;

/// Roles allowed to render one protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    required_roles: &'static [Role],
}

impl AccessRule {
    pub const fn new(required_roles: &'static [Role]) -> Self {
        Self { required_roles }
    }

    pub fn required_roles(&self) -> &'static [Role] {
        self.required_roles
    }

    pub fn permits(&self, role: Role) -> bool {
        self.required_roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session not initialized yet
    Loading,
    Denied,
    Allowed,
}

/// What the view layer should do with a protected navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a neutral placeholder and do not redirect
    Placeholder,
    Render,
    /// Not signed in; go to login and come back to `from` afterwards
    RedirectToLogin { from: String },
    /// Signed in but not allowed; go to the default view
    RedirectToDefault,
}

/// Gatekeeper for one protected view. The rule is the only per-route input.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    rule: AccessRule,
}

impl RouteGuard {
    pub fn new(rule: AccessRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> AccessRule {
        self.rule
    }

    pub fn state(&self, session: &SessionStatus) -> GuardState {
        match session {
            SessionStatus::Loading => GuardState::Loading,
            SessionStatus::Ready(Some(user)) if self.rule.permits(user.role) => GuardState::Allowed,
            SessionStatus::Ready(_) => GuardState::Denied,
        }
    }

    /// Decide what happens to a navigation to `requested`
    pub fn decide(&self, session: &SessionStatus, requested: &str) -> GuardDecision {
        match self.state(session) {
            GuardState::Loading => GuardDecision::Placeholder,
            GuardState::Allowed => GuardDecision::Render,
            GuardState::Denied => match session.user() {
                None => GuardDecision::RedirectToLogin {
                    from: requested.to_string(),
                },
                Some(_) => GuardDecision::RedirectToDefault,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_http::api::User;

    const ADMIN_ONLY: AccessRule = AccessRule::new(&[Role::Admin]);

    fn ready_as(role: Role) -> SessionStatus {
        SessionStatus::Ready(Some(User {
            id: 1,
            name: "Asha".to_string(),
            email: "a@b.com".to_string(),
            role,
            phone: String::new(),
            is_active: true,
            created_at: None,
        }))
    }

    #[test]
    fn test_loading_never_redirects() {
        let guard = RouteGuard::new(ADMIN_ONLY);
        assert_eq!(guard.state(&SessionStatus::Loading), GuardState::Loading);
        assert_eq!(
            guard.decide(&SessionStatus::Loading, "/admin/applications"),
            GuardDecision::Placeholder
        );
    }

    #[test]
    fn test_anonymous_goes_to_login_with_original_path() {
        let guard = RouteGuard::new(ADMIN_ONLY);
        assert_eq!(
            guard.decide(&SessionStatus::Ready(None), "/admin/applications/4"),
            GuardDecision::RedirectToLogin {
                from: "/admin/applications/4".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_role_goes_to_default_not_login() {
        let guard = RouteGuard::new(ADMIN_ONLY);
        let session = ready_as(Role::User);
        assert_eq!(guard.state(&session), GuardState::Denied);
        assert_eq!(
            guard.decide(&session, "/admin/applications"),
            GuardDecision::RedirectToDefault
        );
    }

    #[test]
    fn test_allowed_role_renders() {
        let guard = RouteGuard::new(AccessRule::new(&[Role::Admin, Role::SuperAdmin]));
        for role in [Role::Admin, Role::SuperAdmin] {
            assert_eq!(
                guard.decide(&ready_as(role), "/admin/applications"),
                GuardDecision::Render
            );
        }
        for role in [Role::User, Role::Owner, Role::Auditor] {
            assert_eq!(
                guard.decide(&ready_as(role), "/admin/applications"),
                GuardDecision::RedirectToDefault
            );
        }
    }
}
