//! Identity verification for optional authentication.
//!
//! Verification never fails a request: anything short of a confirmed user
//! yields `None` and the caller is treated as anonymous.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{core::app_config::FirebaseConfig, error_handler::AppError};

/// Verified caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Identity attached to a request by the optional-auth middleware.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolves a bearer token to a user, or `None` if it cannot be verified.
    async fn verify(&self, id_token: &str) -> Option<AuthUser>;
}

/// Verifier used when no identity provider is configured.
pub struct AnonymousVerifier;

#[async_trait]
impl TokenVerifier for AnonymousVerifier {
    async fn verify(&self, _id_token: &str) -> Option<AuthUser> {
        None
    }
}

/// Verifies Firebase ID tokens through Identity Toolkit `accounts:lookup`.
///
/// The web API key travels in the `x-goog-api-key` header, never in the URL.
pub struct FirebaseTokenVerifier {
    client: reqwest::Client,
    url_lookup: String,
}

impl FirebaseTokenVerifier {
    /// # Errors
    /// [`AppError::InvalidConfig`] if the key is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(cfg: FirebaseConfig) -> Result<Self, AppError> {
        let mut key = HeaderValue::from_str(&cfg.api_key).map_err(|_| {
            AppError::InvalidConfig("FIREBASE_WEB_API_KEY is not a valid header value".into())
        })?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                AppError::InvalidConfig(format!(
                    "failed to build firebase client: {}",
                    e.without_url()
                ))
            })?;
        let url_lookup = format!("{}/accounts:lookup", cfg.base_url.trim_end_matches('/'));
        Ok(Self { client, url_lookup })
    }

    /// Calls `accounts:lookup` for one ID token.
    async fn lookup(&self, id_token: &str) -> Result<Option<AuthUser>, LookupError> {
        let resp = self
            .client
            .post(&self.url_lookup)
            .json(&LookupRequest { id_token })
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Rejected(status));
        }

        let body = resp
            .json::<LookupResponse>()
            .await
            .map_err(|e| LookupError::Decode(e.without_url().to_string()))?;
        Ok(body.into_user())
    }
}

/// Failure of a single token lookup. Messages carry no URL or key.
#[derive(Debug, Error)]
enum LookupError {
    #[error("firebase lookup failed: {0}")]
    Transport(String),
    #[error("firebase token rejected with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("failed to decode firebase lookup response: {0}")]
    Decode(String),
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, id_token: &str) -> Option<AuthUser> {
        match self.lookup(id_token).await {
            Ok(user) => {
                debug!(verified = user.is_some(), "firebase token checked");
                user
            }
            Err(e) => {
                warn!(error = %e, "firebase token not verified");
                None
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

impl LookupResponse {
    fn into_user(self) -> Option<AuthUser> {
        self.users
            .into_iter()
            .find(|u| !u.local_id.is_empty())
            .map(|u| AuthUser {
                uid: u.local_id,
                email: u.email,
            })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }

    #[test]
    fn lookup_maps_first_user() {
        let body: LookupResponse = serde_json::from_value(serde_json::json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
            "users": [ {
                "localId": "u-1",
                "email": "hermione@hogwarts.test",
                "emailVerified": true
            } ]
        }))
        .unwrap();
        assert_eq!(
            body.into_user(),
            Some(AuthUser {
                uid: "u-1".into(),
                email: Some("hermione@hogwarts.test".into()),
            })
        );
    }

    #[test]
    fn lookup_without_users_is_anonymous() {
        let body: LookupResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.into_user().is_none());
    }

    #[tokio::test]
    async fn anonymous_verifier_never_resolves() {
        assert!(AnonymousVerifier.verify("token").await.is_none());
    }

    #[tokio::test]
    async fn lookup_failure_text_never_contains_key() {
        let verifier = FirebaseTokenVerifier::new(FirebaseConfig {
            api_key: "SECRET-FIREBASE-KEY".into(),
            base_url: "http://127.0.0.1:9".into(),
        })
        .unwrap();
        assert!(!verifier.url_lookup.contains("SECRET-FIREBASE-KEY"));

        let err = verifier.lookup("token").await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
        let logged = err.to_string();
        assert!(!logged.contains("SECRET-FIREBASE-KEY"), "{logged}");
        assert!(!logged.contains("127.0.0.1"), "{logged}");
    }

    #[test]
    fn key_with_newline_is_config_error() {
        let err = FirebaseTokenVerifier::new(FirebaseConfig {
            api_key: "bad\nkey".into(),
            base_url: "http://127.0.0.1:9".into(),
        })
        .err()
        .unwrap();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn unreachable_firebase_is_anonymous() {
        let verifier = FirebaseTokenVerifier::new(FirebaseConfig {
            api_key: "k".into(),
            base_url: "http://127.0.0.1:9".into(),
        })
        .unwrap();
        assert!(verifier.verify("token").await.is_none());
    }
}
