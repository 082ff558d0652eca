use crate::http::{ApiClient, ApiError, ApiRequest, FilePart};
use shared_http::api::{ApplicationStatusResponse, OwnerApplication, OwnerApplicationRequest, UploadResponse};
use tracing::info;

/// Extensions the upload endpoint accepts
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "webp"];
/// Largest file the upload endpoint accepts
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const UPLOAD_FIELD: &str = "file";

/// A proof document or photo held in memory for upload
#[derive(Clone)]
pub struct UploadFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower-cased extension, if the name has one
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    fn into_part(self) -> Result<FilePart, ApiError> {
        let mime = match self.extension().as_deref() {
            Some("pdf") => "application/pdf",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => {
                return Err(ApiError::InvalidRequest(format!(
                    "Allowed types: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                )));
            }
        };
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidRequest("No file provided".to_string()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidRequest(format!(
                "File too large (max {} MB)",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        Ok(FilePart {
            field: UPLOAD_FIELD.to_string(),
            file_name: self.file_name,
            mime: mime.to_string(),
            bytes: self.bytes,
        })
    }
}

/// Owner-verification workflow for signed-in users
pub struct OwnerApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OwnerApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Submit an application. Refused locally when no proof URL is given
    /// or the declaration is not accepted.
    pub async fn apply(
        &self,
        application: &OwnerApplicationRequest,
    ) -> Result<OwnerApplication, ApiError> {
        if !application.has_at_least_one_proof() {
            return Err(ApiError::InvalidRequest(
                "At least one proof of association is required".to_string(),
            ));
        }
        if !application.declaration_accepted {
            return Err(ApiError::InvalidRequest(
                "The declaration must be accepted".to_string(),
            ));
        }

        let request = ApiRequest::post("owner/apply/").json(application)?;
        let submitted: OwnerApplication = self.client.json(&request).await?;
        info!("Submitted owner application {}", submitted.id);
        Ok(submitted)
    }

    pub async fn application_status(&self) -> Result<ApplicationStatusResponse, ApiError> {
        self.client
            .json(&ApiRequest::get("owner/application-status/"))
            .await
    }

    /// Upload a file as multipart field `file` and return its public URL.
    /// Type and size limits are checked before anything is sent.
    pub async fn upload(&self, file: UploadFile) -> Result<String, ApiError> {
        let request = ApiRequest::post("owner/upload/").file(file.into_part()?);
        let uploaded: UploadResponse = self.client.json(&request).await?;
        Ok(uploaded.url)
    }
}
