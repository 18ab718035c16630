//! Shared types for the Food Now backend
//!
//! Common types used across server crates: the unified error system
//! (error codes, `AppError`, `ApiResponse`) and its HTTP integration.

pub mod error;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
