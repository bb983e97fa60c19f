//! Aggregate statistics over a full directory listing.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::user::UserRecord;

/// Response body of `GET /stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: usize,
    pub active_users: usize,
    pub verified_users: usize,
    pub new_this_month: usize,
    pub disabled_users: usize,
}

impl UserStats {
    /// Compute statistics for `users` relative to `now`.
    ///
    /// A user counts as new this month when its creation time, expressed in
    /// `now`'s time zone, falls in the same calendar month and year as `now`.
    pub fn compute<Tz: TimeZone>(users: &[UserRecord], now: &DateTime<Tz>) -> Self {
        let total_users = users.len();
        let active_users = users.iter().filter(|u| !u.disabled).count();
        let verified_users = users.iter().filter(|u| u.email_verified).count();
        let new_this_month = users
            .iter()
            .filter(|u| created_in_month_of(u.created, now))
            .count();

        Self {
            total_users,
            active_users,
            verified_users,
            new_this_month,
            disabled_users: total_users - active_users,
        }
    }
}

fn created_in_month_of<Tz: TimeZone>(created_ms: i64, now: &DateTime<Tz>) -> bool {
    match now.timezone().timestamp_millis_opt(created_ms).single() {
        Some(created) => created.year() == now.year() && created.month() == now.month(),
        None => false,
    }
}
