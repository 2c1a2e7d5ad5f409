//! Device control API: federated session tokens, media URI templates and
//! the camera/audio-gateway directory.

mod directory;
mod media;
mod session;

pub use directory::{build_device_map, ApiDirectory, DeviceDirectory, DeviceFilter};
pub use media::{fetch_media_uris, MediaSource, MediaUris};
pub use session::{acquire, SessionToken};

use serde::de::DeserializeOwned;

use crate::error::FootageError;
use crate::http::HttpClient;

/// HTTP client bound to one control API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: HttpClient,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/camera/getMediaUris`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `body` to `path` and decode a successful JSON response.
    pub(crate) fn post_for<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, FootageError> {
        let resp = self.http.post_json(&self.endpoint(path), body)?;
        if !resp.is_success() {
            return Err(FootageError::Api {
                endpoint: path.to_string(),
                status: resp.status,
                body: resp.text().into_owned(),
            });
        }
        serde_json::from_slice(&resp.body).map_err(|e| FootageError::Api {
            endpoint: path.to_string(),
            status: resp.status,
            body: format!("undecodable response ({}): {}", e, resp.text()),
        })
    }
}
