pub mod api;
pub mod auth;
pub mod events;
pub mod http;
pub mod routing;

pub use api::{AdminApi, OwnerApi, RestaurantsApi, SuperAdminApi, UploadFile};
pub use auth::{SessionContext, SessionStatus, SessionStore};
pub use http::{ApiClient, ApiError, ApiRequest};
pub use routing::{AppRouter, MemoryHistory, Navigator, Route, RouteGuard};
