//! Database module
//!
//! Runtime-checked sqlx queries over embedded SQLite. Each submodule
//! groups the queries for one surface; none of them hold state beyond
//! the pool they are handed.

pub mod chef_dashboard;
pub mod dashboard;
pub mod schedules;
pub mod users;

/// Embedded migrations, applied at startup and by tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
