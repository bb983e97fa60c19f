//! Firebase Authentication user directory (Identity Toolkit REST API).

use std::path::Path;

use admin_common::UserRecord;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{ServiceAccountKey, ServiceAccountTokenSource, UserDirectory, UserPage};
use crate::config::FirebaseConfig;
use crate::error::{DirectoryError, InitError};

const MAX_PAGE_SIZE: u32 = 1000;
const MAX_UID_LENGTH: usize = 128;
/// Bearer token the Auth emulator accepts as a privileged admin.
const EMULATOR_TOKEN: &str = "owner";

enum Auth {
    ServiceAccount(ServiceAccountTokenSource),
    Emulator,
}

/// Firebase Authentication directory.
///
/// Talks to the Identity Toolkit v1 API, either in production with a
/// service account or against a local Auth emulator.
pub struct FirebaseDirectory {
    http_client: Client,
    project_url: String,
    page_size: u32,
    auth: Auth,
}

impl FirebaseDirectory {
    /// Build a directory client from configuration.
    ///
    /// Reads and validates the service account key unless an emulator host
    /// is configured.
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, InitError> {
        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            return Err(InitError::InvalidConfig(format!(
                "firebase.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, config.page_size
            )));
        }

        let http_client = Client::builder().build()?;

        if let Some(ref host) = config.emulator_host {
            let project_id = config.project_id.clone().ok_or_else(|| {
                InitError::InvalidConfig(
                    "firebase.project_id is required when using the Auth emulator".to_string(),
                )
            })?;
            let base_url = format!("http://{}/identitytoolkit.googleapis.com/v1", host);
            tracing::info!("Using Firebase Auth emulator at {}", host);

            return Ok(Self::new(
                http_client,
                &base_url,
                &project_id,
                config.page_size,
                Auth::Emulator,
            ));
        }

        let key = ServiceAccountKey::from_file(Path::new(&config.credentials_path))?;
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());
        let token_source = ServiceAccountTokenSource::new(http_client.clone(), &key)?;

        tracing::info!(
            "Loaded service account {} for project {}",
            key.client_email,
            project_id
        );

        Ok(Self::new(
            http_client,
            &config.api_base_url,
            &project_id,
            config.page_size,
            Auth::ServiceAccount(token_source),
        ))
    }

    fn new(
        http_client: Client,
        base_url: &str,
        project_id: &str,
        page_size: u32,
        auth: Auth,
    ) -> Self {
        Self {
            http_client,
            project_url: format!("{}/projects/{}", base_url.trim_end_matches('/'), project_id),
            page_size,
            auth,
        }
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, DirectoryError> {
        let token = match &self.auth {
            Auth::ServiceAccount(source) => source.access_token().await?,
            Auth::Emulator => EMULATOR_TOKEN.to_string(),
        };
        Ok(request.bearer_auth(token))
    }
}

// ============================================================================
// Identity Toolkit API types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    local_id: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_login_at: Option<String>,
    #[serde(default)]
    provider_user_info: Vec<ProviderUserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUserInfo {
    provider_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl TryFrom<AccountInfo> for UserRecord {
    type Error = DirectoryError;

    fn try_from(account: AccountInfo) -> Result<Self, Self::Error> {
        let created = match account.created_at.as_deref() {
            Some(raw) => parse_millis(raw).ok_or_else(|| {
                DirectoryError::Unexpected(format!(
                    "Invalid createdAt for user {}: {}",
                    account.local_id, raw
                ))
            })?,
            // `UserRecord::created` is required: a missing createdAt fails the
            // record rather than serializing as null.
            None => {
                return Err(DirectoryError::Unexpected(format!(
                    "User {} has no creation timestamp",
                    account.local_id
                )))
            }
        };
        let last_login = account.last_login_at.as_deref().and_then(parse_millis);

        Ok(UserRecord {
            uid: account.local_id,
            email: account.email,
            name: account.display_name,
            phone: account.phone_number,
            email_verified: account.email_verified,
            disabled: account.disabled,
            created,
            last_login,
            providers: account
                .provider_user_info
                .into_iter()
                .map(|p| p.provider_id)
                .collect(),
        })
    }
}

/// Identity Toolkit encodes millisecond timestamps as decimal strings.
fn parse_millis(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn validate_uid(uid: &str) -> Result<(), DirectoryError> {
    if uid.is_empty() || uid.chars().count() > MAX_UID_LENGTH {
        return Err(DirectoryError::Unexpected(format!(
            "Invalid uid: \"{}\". The uid must be a non-empty string with no more than {} characters.",
            uid, MAX_UID_LENGTH
        )));
    }
    Ok(())
}

/// Extract the API error message (e.g. "USER_NOT_FOUND") from a failed response.
async fn error_message(response: Response) -> (reqwest::StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    (status, message)
}

// ============================================================================
// UserDirectory implementation
// ============================================================================

#[async_trait]
impl UserDirectory for FirebaseDirectory {
    fn backend_name(&self) -> &'static str {
        "firebase"
    }

    async fn list_users_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<UserPage, DirectoryError> {
        let url = format!("{}/accounts:batchGet", self.project_url);

        let mut query = vec![("maxResults", self.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("nextPageToken", token.to_string()));
        }

        let request = self.authorize(self.http_client.get(&url).query(&query)).await?;
        let response = request.send().await?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            tracing::warn!("Listing users failed ({}): {}", status, message);
            return Err(DirectoryError::Unexpected(format!(
                "Identity Toolkit returned {}: {}",
                status, message
            )));
        }

        let page: BatchGetResponse = response.json().await?;
        let users = page
            .users
            .into_iter()
            .map(UserRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserPage {
            users,
            next_page_token: page.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, DirectoryError> {
        validate_uid(uid)?;

        let url = format!("{}/accounts:lookup", self.project_url);
        let body = LookupRequest { local_id: [uid] };

        let request = self.authorize(self.http_client.post(&url).json(&body)).await?;
        let response = request.send().await?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            if message.starts_with("USER_NOT_FOUND") {
                return Err(DirectoryError::NotFound(uid.to_string()));
            }
            tracing::warn!("Looking up user {} failed ({}): {}", uid, status, message);
            return Err(DirectoryError::Unexpected(format!(
                "Identity Toolkit returned {}: {}",
                status, message
            )));
        }

        let lookup: LookupResponse = response.json().await?;
        match lookup.users.into_iter().next() {
            Some(account) => UserRecord::try_from(account),
            None => Err(DirectoryError::NotFound(uid.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(value: serde_json::Value) -> AccountInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_account_maps_to_user_record() {
        let user = UserRecord::try_from(account(json!({
            "localId": "abc",
            "email": "ada@example.com",
            "displayName": "Ada",
            "phoneNumber": "+15555550100",
            "emailVerified": true,
            "disabled": false,
            "createdAt": "1700000000000",
            "lastLoginAt": "1700000500000",
            "providerUserInfo": [
                {"providerId": "password", "email": "ada@example.com"},
                {"providerId": "google.com", "rawId": "123"}
            ]
        })))
        .unwrap();

        assert_eq!(user.uid, "abc");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.phone.as_deref(), Some("+15555550100"));
        assert!(user.email_verified);
        assert!(!user.disabled);
        assert_eq!(user.created, 1_700_000_000_000);
        assert_eq!(user.last_login, Some(1_700_000_500_000));
        assert_eq!(user.providers, vec!["password", "google.com"]);
    }

    #[test]
    fn test_sparse_account_uses_defaults() {
        let user = UserRecord::try_from(account(json!({
            "localId": "anon",
            "createdAt": "1"
        })))
        .unwrap();

        assert!(user.email.is_none());
        assert!(!user.email_verified);
        assert!(!user.disabled);
        assert!(user.last_login.is_none());
        assert!(user.providers.is_empty());
    }

    #[test]
    fn test_unparsable_created_at_is_unexpected() {
        let err = UserRecord::try_from(account(json!({
            "localId": "abc",
            "createdAt": "yesterday"
        })))
        .unwrap_err();
        assert!(matches!(err, DirectoryError::Unexpected(_)));
    }

    #[test]
    fn test_missing_created_at_is_rejected_not_nulled() {
        let err = UserRecord::try_from(account(json!({ "localId": "abc" }))).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::Unexpected("User abc has no creation timestamp".to_string())
        );
    }

    #[test]
    fn test_validate_uid() {
        assert!(validate_uid("abc").is_ok());
        assert!(validate_uid(&"x".repeat(128)).is_ok());
        assert!(validate_uid("").is_err());
        assert!(validate_uid(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let config = FirebaseConfig {
            page_size: 0,
            ..FirebaseConfig::default()
        };
        assert!(matches!(
            FirebaseDirectory::from_config(&config),
            Err(InitError::InvalidConfig(_))
        ));

        let config = FirebaseConfig {
            page_size: 1001,
            ..FirebaseConfig::default()
        };
        assert!(matches!(
            FirebaseDirectory::from_config(&config),
            Err(InitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_emulator_requires_project_id() {
        let config = FirebaseConfig {
            emulator_host: Some("localhost:9099".to_string()),
            ..FirebaseConfig::default()
        };
        assert!(matches!(
            FirebaseDirectory::from_config(&config),
            Err(InitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_project_url_normalization() {
        let config = FirebaseConfig {
            emulator_host: Some("localhost:9099".to_string()),
            project_id: Some("iron-lady".to_string()),
            ..FirebaseConfig::default()
        };
        let directory = FirebaseDirectory::from_config(&config).unwrap();
        assert_eq!(
            directory.project_url,
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/projects/iron-lady"
        );
    }
}
