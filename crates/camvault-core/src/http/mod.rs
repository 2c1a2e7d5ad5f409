//! Blocking HTTP client for the control API and the camera media endpoint.
//!
//! Uses the curl crate (libcurl). Every transfer runs in the calling thread;
//! call from `spawn_blocking` or a worker thread when used from async code.
//! TLS verification is off: on-LAN devices present self-signed certificates.

mod response;

pub use response::HttpResponse;

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::FetchError;

/// How API requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// API key only (`x-auth-scheme: api-token`).
    ApiToken,
    /// API key plus a client certificate (`x-auth-scheme: api`).
    Certificate { cert: PathBuf, private_key: PathBuf },
}

impl AuthScheme {
    fn header_value(&self) -> &'static str {
        match self {
            AuthScheme::ApiToken => "api-token",
            AuthScheme::Certificate { .. } => "api",
        }
    }
}

/// Shared request settings. Cheap to clone; each request builds its own curl handle.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api_key: String,
    auth: AuthScheme,
    connect_timeout: Duration,
    request_timeout: Duration,
}

enum Body<'a> {
    None,
    Json(&'a [u8]),
}

impl HttpClient {
    pub fn new(api_key: impl Into<String>, auth: AuthScheme) -> Self {
        Self {
            api_key: api_key.into(),
            auth,
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn auth(&self) -> &AuthScheme {
        &self.auth
    }

    /// POST a JSON body to a control API endpoint. Presents the client
    /// certificate when certificate auth is configured.
    pub fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, FetchError> {
        let payload = body.to_string();
        tracing::debug!(url, body = %payload, "POST");
        let mut headers = self.auth_headers();
        headers.push("Content-Type: application/json".to_string());
        headers.push("Accept: application/json".to_string());
        let resp = self.perform(url, Body::Json(payload.as_bytes()), &headers, true)?;
        tracing::debug!(url, status = resp.status, body = %resp.text(), "POST response");
        Ok(resp)
    }

    /// GET a manifest or segment from the media endpoint, presenting the
    /// session cookie (`RSESSIONID=RFT:<token>`).
    pub fn get_media(&self, url: &str, session_cookie: &str) -> Result<HttpResponse, FetchError> {
        tracing::debug!(url, "GET");
        let mut headers = self.auth_headers();
        headers.push(format!("Cookie: {}", session_cookie));
        let resp = self.perform(url, Body::None, &headers, false)?;
        tracing::debug!(url, status = resp.status, bytes = resp.body.len(), "GET response");
        Ok(resp)
    }

    fn auth_headers(&self) -> Vec<String> {
        vec![
            format!("x-auth-scheme: {}", self.auth.header_value()),
            format!("x-auth-apikey: {}", self.api_key),
        ]
    }

    fn perform(
        &self,
        url: &str,
        body: Body<'_>,
        headers: &[String],
        present_cert: bool,
    ) -> Result<HttpResponse, FetchError> {
        let mut data = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;

        if present_cert {
            if let AuthScheme::Certificate { cert, private_key } = &self.auth {
                easy.ssl_cert(cert)?;
                easy.ssl_key(private_key)?;
            }
        }

        if let Body::Json(bytes) = body {
            easy.post(true)?;
            easy.post_fields_copy(bytes)?;
        }

        let mut list = curl::easy::List::new();
        for h in headers {
            list.append(h)?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|chunk| {
                data.extend_from_slice(chunk);
                Ok(chunk.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse { status, body: data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_scheme_header_values() {
        assert_eq!(AuthScheme::ApiToken.header_value(), "api-token");
        let cert = AuthScheme::Certificate {
            cert: PathBuf::from("api.crt"),
            private_key: PathBuf::from("api.key"),
        };
        assert_eq!(cert.header_value(), "api");
    }

    #[test]
    fn auth_headers_carry_api_key() {
        let client = HttpClient::new("secret-key", AuthScheme::ApiToken);
        let headers = client.auth_headers();
        assert!(headers.contains(&"x-auth-scheme: api-token".to_string()));
        assert!(headers.contains(&"x-auth-apikey: secret-key".to_string()));
    }

    #[test]
    fn unreachable_host_is_a_curl_error() {
        let client = HttpClient::new("k", AuthScheme::ApiToken)
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(2));
        let res = client.get_media("http://127.0.0.1:1/clip.mpd", "RSESSIONID=RFT:x");
        assert!(matches!(res, Err(FetchError::Curl(_))));
    }
}
