use super::models::{ApplicationStatus, RestaurantStatus, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body for a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Response body for `POST /auth/refresh/`.
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantPhoto {
    pub id: u64,
    #[serde(default)]
    pub restaurant: Option<u64>,
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub order: u32,
}

/// Restaurant as returned by both the public and owner endpoints.
/// Owner-only fields are absent from the public serializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: u64,
    #[serde(default)]
    pub owner: Option<u64>,
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub google_maps_link: String,
    // Decimal fields arrive as strings
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub operating_hours: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: Option<RestaurantStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<RestaurantPhoto>,
}

impl Restaurant {
    /// Parsed coordinates, if both are present and numeric
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_deref()?.trim().parse().ok()?;
        let lng = self.longitude.as_deref()?.trim().parse().ok()?;
        Some((lat, lng))
    }
}

/// Owner application. The admin list endpoint only returns a summary,
/// so everything past `status` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerApplication {
    pub id: u64,
    pub user: u64,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    pub restaurant_name: String,
    #[serde(default)]
    pub city: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub business_address: Option<String>,
    #[serde(default)]
    pub google_maps_link: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub contact_person_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub proof_document_url: Option<String>,
    #[serde(default)]
    pub business_card_url: Option<String>,
    #[serde(default)]
    pub owner_photo_url: Option<String>,
    #[serde(default)]
    pub utility_bill_url: Option<String>,
    #[serde(default)]
    pub storefront_photo_url: Option<String>,
    #[serde(default)]
    pub dining_photo_url: Option<String>,
    #[serde(default)]
    pub declaration_accepted: Option<bool>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<u64>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Response body for `GET /owner/application-status/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusResponse {
    pub applications: Vec<OwnerApplication>,
    pub latest: Option<OwnerApplication>,
}
