pub mod client;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::{ApiError, extract_message};
pub use request::{ApiRequest, FilePart, RequestBody};
pub use reqwest::StatusCode;
