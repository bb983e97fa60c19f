//! User directory snapshot and response bodies.

use serde::{Deserialize, Serialize};

/// Read-only snapshot of one directory user.
///
/// Built fresh for every response and dropped after serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number in E.164 format.
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
    /// Creation time in epoch milliseconds.
    pub created: i64,
    /// Last sign-in time in epoch milliseconds.
    #[serde(default)]
    pub last_login: Option<i64>,
    /// Authentication provider ids (e.g. "password", "google.com").
    #[serde(default)]
    pub providers: Vec<String>,
}

impl UserRecord {
    /// Create a record with only the required fields set.
    pub fn new(uid: impl Into<String>, created: i64) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            name: None,
            phone: None,
            email_verified: false,
            disabled: false,
            created,
            last_login: None,
            providers: Vec::new(),
        }
    }
}

/// Response body of `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserRecord>,
}

impl ListUsersResponse {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            success: true,
            count: users.len(),
            users,
        }
    }
}

/// Response body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_wire_keys() {
        let mut user = UserRecord::new("abc123", 1_700_000_000_000);
        user.email = Some("ada@example.com".to_string());
        user.name = Some("Ada".to_string());
        user.providers = vec!["password".to_string()];

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["uid"], "abc123");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["name"], "Ada");
        assert!(json["phone"].is_null());
        assert_eq!(json["email_verified"], false);
        assert_eq!(json["disabled"], false);
        assert_eq!(json["created"], 1_700_000_000_000i64);
        assert!(json["last_login"].is_null());
        assert_eq!(json["providers"], serde_json::json!(["password"]));
    }

    #[test]
    fn test_list_users_response_counts_users() {
        let response = ListUsersResponse::new(vec![
            UserRecord::new("a", 0),
            UserRecord::new("b", 0),
        ]);
        assert!(response.success);
        assert_eq!(response.count, 2);

        let empty = ListUsersResponse::new(Vec::new());
        assert_eq!(empty.count, 0);
        assert!(empty.users.is_empty());
    }
}
