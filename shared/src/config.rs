use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::{Error, Result};

/// Client configuration resolved from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base of every REST call, without a trailing slash, e.g. `http://127.0.0.1:8000/api`
    pub api_base_url: String,
    /// Directory holding the durable token store
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8000/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            data_dir: default_data_dir(),
            request_timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        let api_base_url =
            std::env::var("FOODAS_API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());

        let data_dir = std::env::var("FOODAS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let timeout_secs = match std::env::var("FOODAS_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "FOODAS_REQUEST_TIMEOUT_SECS={} is not a number, using {}s",
                    raw,
                    Self::DEFAULT_TIMEOUT_SECS
                );
                Self::DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => Self::DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_base_url: normalize_base_url(&api_base_url),
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Join an endpoint path such as `auth/login/` onto the API base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Location of the sled database holding the token pair
    pub fn token_store_path(&self) -> PathBuf {
        self.data_dir.join("session.sled")
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_data_dir() -> PathBuf {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home_dir).join(".foodas")
}
