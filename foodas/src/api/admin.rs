use crate::http::{ApiClient, ApiError, ApiRequest};
use shared_http::api::{OwnerApplication, ReviewRequest};
use tracing::info;

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_applications(&self) -> Result<Vec<OwnerApplication>, ApiError> {
        self.client
            .json(&ApiRequest::get("admin/owner-applications/"))
            .await
    }

    pub async fn get_application(&self, id: u64) -> Result<OwnerApplication, ApiError> {
        self.client
            .json(&ApiRequest::get(format!("admin/owner-applications/{}/", id)))
            .await
    }

    pub async fn approve(&self, id: u64, notes: &str) -> Result<OwnerApplication, ApiError> {
        self.review(id, "approve", notes).await
    }

    pub async fn reject(&self, id: u64, notes: &str) -> Result<OwnerApplication, ApiError> {
        self.review(id, "reject", notes).await
    }

    async fn review(&self, id: u64, action: &str, notes: &str) -> Result<OwnerApplication, ApiError> {
        let request = ApiRequest::patch(format!("admin/owner-applications/{}/{}/", id, action))
            .json(&ReviewRequest {
                review_notes: notes.to_string(),
            })?;
        let reviewed: OwnerApplication = self.client.json(&request).await?;
        info!("Application {} is now {:?}", id, reviewed.status);
        Ok(reviewed)
    }
}
