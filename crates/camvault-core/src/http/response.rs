//! Buffered HTTP response.

use std::borrow::Cow;

use crate::retry::FetchError;

/// Status and full body of one response. Bodies are small: JSON control
/// responses, manifests, or a single 2-second media segment.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for logging and error reports (lossy).
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Turn a non-2xx response into `FetchError::Http` so it can be classified for retry.
    pub fn error_for_status(self, url: &str) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Http {
                status: self.status,
                url: url.to_string(),
                body: self.text().into_owned(),
            })
        }
    }
}
