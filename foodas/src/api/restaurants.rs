use crate::http::{ApiClient, ApiError, ApiRequest};
use shared_http::api::{CreatePhotoRequest, Restaurant, RestaurantPhoto, RestaurantUpdate};

/// Public directory plus the signed-in owner's own restaurant
pub struct RestaurantsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RestaurantsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Approved restaurants, filtered by name/address and city. Blank filters are not sent.
    pub async fn list(&self, search: &str, city: &str) -> Result<Vec<Restaurant>, ApiError> {
        let request = ApiRequest::get("restaurants/")
            .query("search", search)
            .query("city", city);
        self.client.json(&request).await
    }

    pub async fn get(&self, id: u64) -> Result<Restaurant, ApiError> {
        self.client
            .json(&ApiRequest::get(format!("restaurants/{}/", id)))
            .await
    }

    pub async fn me(&self) -> Result<Restaurant, ApiError> {
        self.client.json(&ApiRequest::get("restaurants/me/")).await
    }

    pub async fn update_me(&self, update: &RestaurantUpdate) -> Result<Restaurant, ApiError> {
        let request = ApiRequest::patch("restaurants/me/").json(update)?;
        self.client.json(&request).await
    }

    pub async fn add_photo(
        &self,
        image_url: &str,
        caption: &str,
        order: u32,
    ) -> Result<RestaurantPhoto, ApiError> {
        let request = ApiRequest::post("restaurants/me/photos/").json(&CreatePhotoRequest {
            image_url: image_url.to_string(),
            caption: caption.to_string(),
            order,
        })?;
        self.client.json(&request).await
    }

    pub async fn delete_photo(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .execute(&ApiRequest::delete(format!("restaurants/me/photos/{}/", id)))
            .await
    }
}
