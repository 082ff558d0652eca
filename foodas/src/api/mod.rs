//! Typed wrappers over the backend's resource namespaces. Every call goes
//! through [`ApiClient::send`], so bearer attachment and token refresh apply.

pub mod admin;
pub mod owner;
pub mod restaurants;
pub mod superadmin;

pub use admin::AdminApi;
pub use owner::{OwnerApi, UploadFile};
pub use restaurants::RestaurantsApi;
pub use superadmin::SuperAdminApi;

use crate::http::ApiClient;

impl ApiClient {
    pub fn restaurants(&self) -> RestaurantsApi<'_> {
        RestaurantsApi::new(self)
    }

    pub fn owner(&self) -> OwnerApi<'_> {
        OwnerApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn superadmin(&self) -> SuperAdminApi<'_> {
        SuperAdminApi::new(self)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{MemoryStore, SessionContext, TokenPair};
    use crate::http::ApiClient;
    use crate::routing::MemoryHistory;
    use shared::config::Config;
    use std::sync::Arc;
    use wiremock::MockServer;

    /// Client signed in with access token `a1`
    pub fn signed_in_client(server: &MockServer) -> ApiClient {
        let store = Arc::new(MemoryStore::new());
        TokenPair::new("a1", "r1").persist(store.as_ref()).unwrap();
        let session = Arc::new(SessionContext::open(store).unwrap());
        let config = Config::new(format!("{}/api", server.uri()));
        ApiClient::new(config, session, Arc::new(MemoryHistory::new())).unwrap()
    }
}
