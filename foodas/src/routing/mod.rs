pub mod guard;
pub mod menu;
pub mod navigator;
pub mod route;
pub mod router;

pub use guard::{AccessRule, GuardDecision, GuardState, RouteGuard};
pub use menu::{NavLink, nav_links};
pub use navigator::{Location, MemoryHistory, Navigator};
pub use route::Route;
pub use router::{AppRouter, Navigation};
