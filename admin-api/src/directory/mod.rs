//! User directory abstraction layer.
//!
//! This module defines the `UserDirectory` trait that hides the external
//! identity provider behind a small read-only interface. Route handlers only
//! ever see `UserRecord`s and `DirectoryError`s.

mod credentials;
mod firebase;
mod token;

pub use credentials::ServiceAccountKey;
pub use firebase::FirebaseDirectory;
pub use token::ServiceAccountTokenSource;

use admin_common::UserRecord;
use async_trait::async_trait;

use crate::error::DirectoryError;

/// One page of a directory listing.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    /// Cursor for the following page. `None` or empty once exhausted.
    pub next_page_token: Option<String>,
}

/// Read-only access to an external user directory.
///
/// The directory owns pagination: callers pass back whatever cursor the
/// previous page returned.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Short name of the backing service, for logs.
    fn backend_name(&self) -> &'static str;

    /// Fetch one page of users, starting after `page_token`.
    async fn list_users_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<UserPage, DirectoryError>;

    /// Look up a single user by uid.
    async fn get_user(&self, uid: &str) -> Result<UserRecord, DirectoryError>;
}

/// Walk every page of the directory and collect all users.
pub async fn fetch_all_users(
    directory: &dyn UserDirectory,
) -> Result<Vec<UserRecord>, DirectoryError> {
    let mut users = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = directory.list_users_page(page_token.as_deref()).await?;
        pages += 1;
        users.extend(page.users);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(
        "Fetched {} users in {} page(s) from {}",
        users.len(),
        pages,
        directory.backend_name()
    );

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{sample_user, FailingDirectory, InMemoryDirectory};

    #[tokio::test]
    async fn test_fetch_all_users_follows_cursor() {
        let users: Vec<_> = (0..7).map(|i| sample_user(&format!("u{}", i))).collect();
        let directory = InMemoryDirectory::with_page_size(users.clone(), 3);

        let fetched = fetch_all_users(&directory).await.unwrap();
        assert_eq!(fetched, users);
        assert_eq!(directory.pages_served(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_users_empty_directory() {
        let directory = InMemoryDirectory::with_page_size(Vec::new(), 3);
        let fetched = fetch_all_users(&directory).await.unwrap();
        assert!(fetched.is_empty());
        assert_eq!(directory.pages_served(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_users_propagates_error() {
        let err = fetch_all_users(&FailingDirectory::new("backend down"))
            .await
            .unwrap_err();
        assert_eq!(err, DirectoryError::Unexpected("backend down".to_string()));
    }
}
