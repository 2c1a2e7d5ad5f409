//! Federated session tokens for the media endpoint.

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::FootageError;

pub const FEDERATED_TOKEN_PATH: &str = "/api/org/generateFederatedSessionToken";

/// Short-lived credential presented to the media endpoint as a cookie.
/// Each track download acquires its own; tokens are never cached or shared.
#[derive(Debug, Clone)]
pub struct SessionToken {
    token: String,
    issued_at: Instant,
    ttl: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FederatedTokenResponse {
    federated_session_token: String,
}

impl SessionToken {
    pub fn new(token: impl Into<String>, ttl: Duration) -> Self {
        Self {
            token: token.into(),
            issued_at: Instant::now(),
            ttl,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.issued_at.elapsed() >= self.ttl
    }

    /// Cookie value for media requests: `RSESSIONID=RFT:<token>`.
    pub fn cookie(&self) -> String {
        format!("RSESSIONID=RFT:{}", self.token)
    }
}

/// Requests a federated session token valid for `ttl_secs`.
///
/// Fails with `FootageError::Auth` (carrying the raw body) on a non-success
/// status or a body without `federatedSessionToken`.
pub fn acquire(api: &ApiClient, ttl_secs: u64) -> Result<SessionToken, FootageError> {
    let resp = api
        .http()
        .post_json(&api.endpoint(FEDERATED_TOKEN_PATH), &json!({ "durationSec": ttl_secs }))?;

    if !resp.is_success() {
        return Err(FootageError::Auth {
            status: resp.status,
            body: resp.text().into_owned(),
        });
    }

    let parsed: FederatedTokenResponse =
        serde_json::from_slice(&resp.body).map_err(|e| FootageError::Auth {
            status: resp.status,
            body: format!("no federatedSessionToken in response ({}): {}", e, resp.text()),
        })?;

    Ok(SessionToken::new(
        parsed.federated_session_token,
        Duration::from_secs(ttl_secs),
    ))
}
