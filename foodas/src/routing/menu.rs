use super::route::Route;
use shared_http::api::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

impl NavLink {
    const fn new(label: &'static str, route: Route) -> Self {
        Self { label, route }
    }

    /// Active when the current path is the link target, or below it
    /// for anything other than the root.
    pub fn is_active(&self, current_path: &str) -> bool {
        let target = self.route.path();
        if target == "/" {
            return current_path == "/";
        }
        current_path == target || current_path.starts_with(&target)
    }
}

/// Sidebar entries for the signed-in user (or an anonymous visitor)
pub fn nav_links(user: Option<&User>) -> Vec<NavLink> {
    let mut links = vec![
        NavLink::new("Browse", Route::Browse),
        NavLink::new("Dashboard", Route::Dashboard),
    ];

    let Some(user) = user else {
        links.push(NavLink::new("Sign in", Route::Login));
        return links;
    };

    match user.role {
        Role::User => {
            links.push(NavLink::new("Apply as Owner", Route::Apply));
            links.push(NavLink::new("My Application", Route::ApplicationStatus));
        }
        Role::Owner => links.push(NavLink::new("Owner Dashboard", Route::OwnerDashboard)),
        Role::Admin => links.push(NavLink::new("Review Applications", Route::AdminApplications)),
        Role::SuperAdmin => {
            links.push(NavLink::new("User Management", Route::SuperAdminUsers));
            links.push(NavLink::new("Create User", Route::SuperAdminCreateUser));
            links.push(NavLink::new("Review Applications", Route::AdminApplications));
        }
        Role::Auditor => {}
    }

    links
}
