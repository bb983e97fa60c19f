//! In-memory directories for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use admin_common::UserRecord;
use async_trait::async_trait;

use crate::config::Config;
use crate::directory::{UserDirectory, UserPage};
use crate::error::DirectoryError;
use crate::state::AppState;

/// 2021-03-04T05:06:07Z, safely outside the current month.
pub const OLD_TIMESTAMP_MS: i64 = 1_614_834_367_000;

/// A directory holding a fixed user list, served in pages of `page_size`.
///
/// Page tokens are the stringified offset of the next page.
pub struct InMemoryDirectory {
    users: Vec<UserRecord>,
    page_size: usize,
    pages_served: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self::with_page_size(users, 1000)
    }

    pub fn with_page_size(users: Vec<UserRecord>, page_size: usize) -> Self {
        Self {
            users,
            page_size: page_size.max(1),
            pages_served: AtomicUsize::new(0),
        }
    }

    /// Number of `list_users_page` calls answered so far.
    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_users_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<UserPage, DirectoryError> {
        let offset = match page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| DirectoryError::Unexpected(format!("bad page token: {}", token)))?,
            None => 0,
        };
        self.pages_served.fetch_add(1, Ordering::SeqCst);

        let end = (offset + self.page_size).min(self.users.len());
        let users = self.users.get(offset..end).unwrap_or_default().to_vec();
        let next_page_token = (end < self.users.len()).then(|| end.to_string());

        Ok(UserPage {
            users,
            next_page_token,
        })
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, DirectoryError> {
        self.users
            .iter()
            .find(|u| u.uid == uid)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(uid.to_string()))
    }
}

/// A directory whose every call fails with `Unexpected(message)`.
pub struct FailingDirectory {
    message: String,
}

impl FailingDirectory {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl UserDirectory for FailingDirectory {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn list_users_page(
        &self,
        _page_token: Option<&str>,
    ) -> Result<UserPage, DirectoryError> {
        Err(DirectoryError::Unexpected(self.message.clone()))
    }

    async fn get_user(&self, _uid: &str) -> Result<UserRecord, DirectoryError> {
        Err(DirectoryError::Unexpected(self.message.clone()))
    }
}

/// An enabled, unverified user created long ago.
pub fn sample_user(uid: &str) -> UserRecord {
    let mut user = UserRecord::new(uid, OLD_TIMESTAMP_MS);
    user.email = Some(format!("{}@example.com", uid));
    user.providers = vec!["password".to_string()];
    user
}

pub fn test_config() -> Config {
    Config {
        api: Default::default(),
        firebase: Default::default(),
        cors: Default::default(),
        logging: Default::default(),
    }
}

pub fn test_state(directory: impl UserDirectory + 'static) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), Arc::new(directory)))
}
