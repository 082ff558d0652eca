use super::models::Role;
use serde::Serialize;

/// Request body for `POST /auth/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register/`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh/`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// === Owner application ===

#[derive(Debug, Clone, Default, Serialize)]
pub struct OwnerApplicationRequest {
    // Business information
    pub restaurant_name: String,
    pub business_address: String,
    pub city: String,
    pub google_maps_link: String,
    pub landmark: String,

    // Operational contact
    pub contact_person_name: String,
    pub contact_phone: String,
    pub alternate_phone: String,
    pub operating_hours: String,

    // Proof of association, at least one required
    pub proof_document_url: String,
    pub business_card_url: String,
    pub owner_photo_url: String,
    pub utility_bill_url: String,

    pub storefront_photo_url: String,
    pub dining_photo_url: String,

    pub declaration_accepted: bool,
}

impl OwnerApplicationRequest {
    pub fn has_at_least_one_proof(&self) -> bool {
        [
            &self.proof_document_url,
            &self.business_card_url,
            &self.owner_photo_url,
            &self.utility_bill_url,
        ]
        .iter()
        .any(|url| !url.trim().is_empty())
    }
}

/// Body for the approve/reject endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewRequest {
    pub review_notes: String,
}

// === Restaurant (owner side) ===

/// Partial update of the owner's restaurant; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RestaurantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePhotoRequest {
    pub image_url: String,
    pub caption: String,
    pub order: u32,
}

// === Super admin user management ===

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
