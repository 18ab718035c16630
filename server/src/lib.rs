//! Food Now backend server
//!
//! Backend of the campus food-ordering marketplace: chefs run time-boxed
//! campaigns, users order against them, and the admin layer tracks
//! transactions and reporting.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── config.rs      # Environment configuration
//! ├── state.rs       # Shared application state (pool, mailer, clock)
//! ├── error.rs       # Service-layer error bridging
//! ├── auth/          # JWT authentication, role guards
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite queries and migrations
//! ├── email/         # Mail delivery (SMTP)
//! └── reporting/     # Dashboard aggregation, CSV/PDF rendering, dispatch
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod reporting;
pub mod state;
pub mod util;

// Re-export public types
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
