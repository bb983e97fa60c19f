//! Iron Lady Admin Common Types
//!
//! Shared types used by the admin API and its tests: the directory user
//! snapshot, response bodies and the statistics computation.

pub mod stats;
pub mod user;

pub use stats::UserStats;
pub use user::{ListUsersResponse, RootResponse, UserRecord};
