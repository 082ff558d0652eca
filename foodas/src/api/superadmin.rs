use crate::http::{ApiClient, ApiError, ApiRequest};
use shared_http::api::{CreateUserRequest, UpdateUserRequest, User};
use tracing::info;

/// Account management, available to super admins only
pub struct SuperAdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SuperAdminApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self, search: &str) -> Result<Vec<User>, ApiError> {
        let request = ApiRequest::get("superadmin/users/").query("search", search);
        self.client.json(&request).await
    }

    pub async fn get_user(&self, id: u64) -> Result<User, ApiError> {
        self.client
            .json(&ApiRequest::get(format!("superadmin/users/{}/", id)))
            .await
    }

    pub async fn update_user(&self, id: u64, update: &UpdateUserRequest) -> Result<User, ApiError> {
        if let Some(role) = update.role.filter(|role| !role.is_assignable()) {
            return Err(ApiError::InvalidRequest(format!("Role {} cannot be assigned", role)));
        }
        let request = ApiRequest::patch(format!("superadmin/users/{}/", id)).json(update)?;
        self.client.json(&request).await
    }

    /// Create an account with the given role. `SUPER_ADMIN` is never assignable.
    pub async fn create_user(&self, profile: &CreateUserRequest) -> Result<User, ApiError> {
        if !profile.role.is_assignable() {
            return Err(ApiError::InvalidRequest(format!(
                "Role {} cannot be assigned",
                profile.role
            )));
        }
        let request = ApiRequest::post("superadmin/users/create/").json(profile)?;
        let user: User = self.client.json(&request).await?;
        info!("Created user {} with role {}", user.id, user.role);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::signed_in_client;
    use serde_json::json;
    use shared_http::api::Role;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user(id: u64, role: &str) -> serde_json::Value {
        json!({"id": id, "name": "Ravi", "email": "ravi@example.com", "role": role})
    }

    #[tokio::test]
    async fn test_list_users_with_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/superadmin/users/"))
            .and(query_param("search", "ravi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([user(8, "AUDITOR")])))
            .expect(1)
            .mount(&server)
            .await;

        let users = signed_in_client(&server)
            .superadmin()
            .list_users("ravi")
            .await
            .unwrap();
        assert_eq!(users[0].role, Role::Auditor);
        assert!(users[0].is_active);
    }

    #[tokio::test]
    async fn test_create_user_posts_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/superadmin/users/create/"))
            .and(body_json(json!({
                "name": "Ravi",
                "email": "ravi@example.com",
                "phone": "",
                "password": "secret123",
                "role": "ADMIN"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(user(9, "ADMIN")))
            .expect(1)
            .mount(&server)
            .await;

        let created = signed_in_client(&server)
            .superadmin()
            .create_user(&CreateUserRequest {
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                phone: String::new(),
                password: "secret123".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_super_admin_role_is_refused_locally() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server);

        let update = UpdateUserRequest {
            role: Some(Role::SuperAdmin),
            ..Default::default()
        };
        assert!(matches!(
            client.superadmin().update_user(8, &update).await,
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_user_deactivates() {
        let server = MockServer::start().await;
        let mut deactivated = user(8, "USER");
        deactivated["is_active"] = json!(false);
        Mock::given(method("PATCH"))
            .and(path("/api/superadmin/users/8/"))
            .and(body_json(json!({"is_active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(deactivated))
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = signed_in_client(&server)
            .superadmin()
            .update_user(8, &update)
            .await
            .unwrap();
        assert!(!updated.is_active);
    }
}
