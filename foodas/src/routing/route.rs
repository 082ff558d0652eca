use super::guard::AccessRule;
use shared_http::api::Role;
use std::fmt;

const USER_ONLY: &[Role] = &[Role::User];
const OWNER_ONLY: &[Role] = &[Role::Owner];
const ADMINS: &[Role] = &[Role::Admin, Role::SuperAdmin];
const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

/// Every view of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Browse,
    RestaurantDetail { id: u64 },
    Dashboard,
    Login,
    Register,
    Apply,
    ApplicationStatus,
    OwnerDashboard,
    OwnerRestaurantEdit,
    OwnerRestaurantPhotos,
    AdminApplications,
    AdminApplicationDetail { id: u64 },
    SuperAdminUsers,
    SuperAdminCreateUser,
    SuperAdminUserDetail { id: u64 },
}

impl Route {
    /// Match a location path against the route table.
    /// Query strings, fragments and trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Browse,
            ["restaurants", id] => Route::RestaurantDetail { id: id.parse().ok()? },
            ["dashboard"] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["apply"] => Route::Apply,
            ["application-status"] => Route::ApplicationStatus,
            ["owner-dashboard"] => Route::OwnerDashboard,
            ["owner-dashboard", "edit"] => Route::OwnerRestaurantEdit,
            ["owner-dashboard", "photos"] => Route::OwnerRestaurantPhotos,
            ["admin", "applications"] => Route::AdminApplications,
            ["admin", "applications", id] => Route::AdminApplicationDetail { id: id.parse().ok()? },
            ["superadmin", "users"] => Route::SuperAdminUsers,
            ["superadmin", "users", "create"] => Route::SuperAdminCreateUser,
            ["superadmin", "users", id] => Route::SuperAdminUserDetail { id: id.parse().ok()? },
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Browse => "/".to_string(),
            Route::RestaurantDetail { id } => format!("/restaurants/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Apply => "/apply".to_string(),
            Route::ApplicationStatus => "/application-status".to_string(),
            Route::OwnerDashboard => "/owner-dashboard".to_string(),
            Route::OwnerRestaurantEdit => "/owner-dashboard/edit".to_string(),
            Route::OwnerRestaurantPhotos => "/owner-dashboard/photos".to_string(),
            Route::AdminApplications => "/admin/applications".to_string(),
            Route::AdminApplicationDetail { id } => format!("/admin/applications/{}", id),
            Route::SuperAdminUsers => "/superadmin/users".to_string(),
            Route::SuperAdminCreateUser => "/superadmin/users/create".to_string(),
            Route::SuperAdminUserDetail { id } => format!("/superadmin/users/{}", id),
        }
    }

    /// `None` for public views
    pub fn access_rule(&self) -> Option<AccessRule> {
        let roles = match self {
            Route::Browse
            | Route::RestaurantDetail { .. }
            | Route::Dashboard
            | Route::Login
            | Route::Register => return None,
            Route::Apply | Route::ApplicationStatus => USER_ONLY,
            Route::OwnerDashboard | Route::OwnerRestaurantEdit | Route::OwnerRestaurantPhotos => {
                OWNER_ONLY
            }
            Route::AdminApplications | Route::AdminApplicationDetail { .. } => ADMINS,
            Route::SuperAdminUsers
            | Route::SuperAdminCreateUser
            | Route::SuperAdminUserDetail { .. } => SUPER_ADMIN_ONLY,
        };
        Some(AccessRule::new(roles))
    }

    pub fn is_protected(&self) -> bool {
        self.access_rule().is_some()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Browse => "Browse restaurants",
            Route::RestaurantDetail { .. } => "Restaurant",
            Route::Dashboard => "Dashboard",
            Route::Login => "Sign in",
            Route::Register => "Create account",
            Route::Apply => "Apply as owner",
            Route::ApplicationStatus => "My application",
            Route::OwnerDashboard => "Owner dashboard",
            Route::OwnerRestaurantEdit => "Edit restaurant",
            Route::OwnerRestaurantPhotos => "Restaurant photos",
            Route::AdminApplications => "Review applications",
            Route::AdminApplicationDetail { .. } => "Application",
            Route::SuperAdminUsers => "User management",
            Route::SuperAdminCreateUser => "Create user",
            Route::SuperAdminUserDetail { .. } => "User",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
