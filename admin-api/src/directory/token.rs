//! OAuth2 access tokens for a service account (JWT bearer grant).

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::ServiceAccountKey;
use crate::error::{DirectoryError, InitError};

const SCOPES: &str =
    "https://www.googleapis.com/auth/cloud-platform https://www.googleapis.com/auth/identitytoolkit";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: u64,
}

/// Exchanges signed assertions for access tokens and reuses them until
/// shortly before expiry.
pub struct ServiceAccountTokenSource {
    http_client: Client,
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    encoding_key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(http_client: Client, key: &ServiceAccountKey) -> Result<Self, InitError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

        Ok(Self {
            http_client,
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
            cached: RwLock::new(None),
        })
    }

    /// Return a valid access token, fetching a new one if needed.
    pub async fn access_token(&self) -> Result<String, DirectoryError> {
        let now = unix_now();

        if let Some(token) = self.cached.read().await.as_ref() {
            if token.expires_at > now + EXPIRY_MARGIN_SECS {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.expires_at > now + EXPIRY_MARGIN_SECS {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn sign_assertion(&self, now: u64) -> Result<String, DirectoryError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| DirectoryError::Unexpected(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self, now: u64) -> Result<CachedToken, DirectoryError> {
        let assertion = self.sign_assertion(now)?;

        tracing::debug!("Requesting access token from {}", self.token_uri);

        let response = self
            .http_client
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Token endpoint returned {}: {}", status, body);
            return Err(DirectoryError::Unexpected(format!(
                "Failed to obtain access token ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
