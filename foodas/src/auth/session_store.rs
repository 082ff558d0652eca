use super::session::SessionContext;
use super::tokens::TokenPair;
use crate::events::SessionEvent;
use crate::http::{ApiClient, ApiError, ApiRequest};
use shared_http::api::{LoginRequest, LoginResponse, RegisterRequest, User};
use std::sync::Arc;
use tokio::sync::{OnceCell, broadcast};
use tracing::{info, warn};

const LOGIN_PATH: &str = "auth/login/";
const REGISTER_PATH: &str = "auth/register/";
const ME_PATH: &str = "auth/me/";

/// Whether the session has been resolved yet
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// Startup validation has not finished
    Loading,
    Ready(Option<User>),
}

impl SessionStatus {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionStatus::Loading => None,
            SessionStatus::Ready(user) => user.as_ref(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready(_))
    }
}

/// Authentication operations over the shared [`SessionContext`].
pub struct SessionStore {
    client: ApiClient,
    ready: OnceCell<()>,
}

impl SessionStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            ready: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        self.client.session()
    }

    /// Resolve the persisted session, once per process.
    ///
    /// With no stored tokens the store becomes ready immediately without a
    /// network call. Otherwise `/auth/me/` is called exactly once; any failure
    /// clears the stored tokens. Later calls return the settled state.
    pub async fn initialize(&self) -> Option<User> {
        self.ready
            .get_or_init(|| self.validate_stored_session())
            .await;
        self.current_user()
    }

    async fn validate_stored_session(&self) {
        let snapshot = self.context().snapshot();
        if snapshot.tokens.is_none() {
            info!("No stored session");
            return;
        }

        match self.client.json::<User>(&ApiRequest::get(ME_PATH)).await {
            Ok(user) => {
                if self.context().restore(snapshot.generation, user.clone()) {
                    info!("Restored session for user {} ({})", user.id, user.role);
                }
            }
            Err(e) => {
                warn!("Stored session is no longer valid: {}", e);
                self.context().invalidate(snapshot.generation);
            }
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.ready.initialized() {
            SessionStatus::Ready(self.current_user())
        } else {
            SessionStatus::Loading
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.context().current_user()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.context().subscribe()
    }

    /// Sign in and store the returned token pair.
    /// On failure the session is left exactly as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH)
            .without_refresh()
            .json(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })?;

        let payload: LoginResponse = self.client.json(&request).await.inspect_err(|e| {
            warn!("Login failed for {}: {}", email, e);
        })?;

        self.context().start(
            TokenPair::new(payload.access.clone(), payload.refresh.clone()),
            payload.user.clone(),
        )?;

        info!(
            "Signed in as user {} ({})",
            payload.user.id, payload.user.role
        );
        Ok(payload)
    }

    /// Create an account. Never signs in; the caller must `login` afterwards.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<User, ApiError> {
        let request = ApiRequest::post(REGISTER_PATH)
            .without_refresh()
            .json(profile)?;
        let user: User = self.client.json(&request).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Forget the tokens and the user. Safe to call at any time.
    pub fn logout(&self) {
        self.context().end();
        info!("Signed out");
    }
}
