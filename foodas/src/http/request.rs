use super::error::ApiError;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// An in-memory file sent as one multipart field
#[derive(Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    File(FilePart),
}

/// A request description that can be dispatched more than once, so the
/// client can replay it after renewing the access token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `auth/me/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Whether a 401 is taken as an expired access token and refreshed
    pub refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            refresh_on_unauthorized: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::File(part);
        self
    }

    /// For endpoints that check credentials themselves: their 401 means
    /// the credentials were wrong, so it is returned without a refresh.
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    /// Add a query parameter; blank values are skipped.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_values_are_omitted() {
        let request = ApiRequest::get("restaurants/")
            .query("search", "  dosa ")
            .query("city", "   ");

        assert_eq!(
            request.query,
            vec![("search".to_string(), "dosa".to_string())]
        );
    }

    #[test]
    fn test_json_body_is_captured_by_value() {
        #[derive(Serialize)]
        struct Body {
            refresh: &'static str,
        }

        let request = ApiRequest::post("auth/refresh/")
            .json(&Body { refresh: "r" })
            .unwrap();

        match request.body {
            RequestBody::Json(value) => assert_eq!(value, serde_json::json!({"refresh": "r"})),
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(request.method, Method::POST);
    }
}
