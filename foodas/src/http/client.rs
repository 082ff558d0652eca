use super::error::ApiError;
use super::request::{ApiRequest, RequestBody};
use crate::auth::SessionContext;
use crate::routing::navigator::{Location, Navigator};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::config::Config;
use shared_http::api::{RefreshRequest, RefreshResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};

const REFRESH_PATH: &str = "auth/refresh/";

/// REST client that attaches the session's bearer token to every request
/// and recovers from a single expired-token 401 per request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<Config>,
    session: Arc<SessionContext>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: Config,
        session: Arc<SessionContext>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            session,
            navigator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Send `request`, returning the first successful response.
    ///
    /// A 401 triggers one refresh with the stored refresh token followed by
    /// one replay. The replay's outcome is final. If the refresh itself fails
    /// the session is ended, the navigator is sent to the login view, and the
    /// original 401 is returned.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let access = self.session.access_token();
        let response = self.dispatch(request, access.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::ensure_success(response).await;
        }

        let rejected = ApiError::from_response(response).await;
        if !request.refresh_on_unauthorized {
            return Err(rejected);
        }

        let current = self.session.snapshot();
        let Some(tokens) = current.tokens else {
            debug!("{} {} rejected with no refresh token", request.method, request.path);
            return Err(rejected);
        };

        match self.refresh(&tokens.refresh).await {
            Ok(refreshed) => {
                match self.session.rotate(current.generation, &refreshed) {
                    Ok(true) => info!("Access token refreshed"),
                    Ok(false) => debug!("Session changed during refresh, renewed token not stored"),
                    Err(e) => warn!("Failed to persist renewed access token: {}", e),
                }

                let replay = self.dispatch(request, Some(&refreshed.access)).await?;
                Self::ensure_success(replay).await
            }
            Err(e) => {
                warn!("Token refresh failed, ending session: {}", e);
                if self.session.expire(current.generation) {
                    self.navigator.navigate(Location::login(), true);
                }
                Err(rejected)
            }
        }
    }

    /// Send `request` and decode the JSON response body
    pub async fn json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send `request` and discard the response body
    pub async fn execute(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self.client.request(request.method.clone(), url.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = access {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::File(file) => {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime)?;
                builder.multipart(Form::new().part(file.field.clone(), part))
            }
        };

        debug!("{} {}", request.method, url);
        Ok(builder.send().await?)
    }

    /// Exchange the refresh token for a new access token. Bypasses `send`
    /// so a failing refresh can never trigger another refresh.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let url = self.config.endpoint(REFRESH_PATH);
        let response = self
            .client
            .post(url.as_str())
            .json(&RefreshRequest {
                refresh: refresh_token.to_string(),
            })
            .send()
            .await?;

        Self::ensure_success(response)
            .await?
            .json::<RefreshResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }
}
