//! Unified error codes for the Food Now backend
//!
//! This module defines all error codes used across the server and its API
//! consumers. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Transaction errors
//! - 6xxx: Food errors
//! - 7xxx: Campaign errors
//! - 8xxx: Report errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is banned
    AccountBanned = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Chef role required
    ChefRequired = 2004,

    // ==================== 3xxx: Account ====================
    /// Profile not found
    ProfileNotFound = 3001,
    /// Chef profile not found
    ChefNotFound = 3002,
    /// Subscription has expired
    SubscriptionExpired = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4002,
    /// Order is empty
    OrderEmpty = 4003,

    // ==================== 5xxx: Transaction ====================
    /// Transaction not found
    TransactionNotFound = 5001,
    /// Transaction has already been approved
    TransactionAlreadyApproved = 5002,
    /// Insufficient balance
    InsufficientBalance = 5003,

    // ==================== 6xxx: Food ====================
    /// Food item not found
    FoodNotFound = 6001,
    /// Food has invalid price
    FoodInvalidPrice = 6002,

    // ==================== 7xxx: Campaign ====================
    /// Campaign not found
    CampaignNotFound = 7001,
    /// Campaign is not running
    CampaignNotRunning = 7002,
    /// Campaign quantity exhausted
    CampaignSoldOut = 7003,

    // ==================== 8xxx: Report ====================
    /// Report date range is invalid
    ReportRangeInvalid = 8001,
    /// Report rendering failed
    ReportRenderFailed = 8002,
    /// Report schedule not found
    ReportScheduleNotFound = 8003,
    /// Report delivery failed
    ReportDeliveryFailed = 8004,
    /// Report schedule frequency is invalid
    ReportFrequencyInvalid = 8005,
    /// Report export format is invalid
    ReportFormatInvalid = 8006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Mail transport not configured
    MailNotConfigured = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountBanned => "Account is banned",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::ChefRequired => "Chef role is required",

            // Account
            ErrorCode::ProfileNotFound => "Profile not found",
            ErrorCode::ChefNotFound => "Chef profile not found",
            ErrorCode::SubscriptionExpired => "Subscription has expired",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderEmpty => "Order is empty",

            // Transaction
            ErrorCode::TransactionNotFound => "Transaction not found",
            ErrorCode::TransactionAlreadyApproved => "Transaction has already been approved",
            ErrorCode::InsufficientBalance => "Insufficient balance",

            // Food
            ErrorCode::FoodNotFound => "Food item not found",
            ErrorCode::FoodInvalidPrice => "Food has an invalid price",

            // Campaign
            ErrorCode::CampaignNotFound => "Campaign not found",
            ErrorCode::CampaignNotRunning => "Campaign is not running",
            ErrorCode::CampaignSoldOut => "Campaign quantity is exhausted",

            // Report
            ErrorCode::ReportRangeInvalid => "Report date range is invalid",
            ErrorCode::ReportRenderFailed => "Report rendering failed",
            ErrorCode::ReportScheduleNotFound => "Report schedule not found",
            ErrorCode::ReportDeliveryFailed => "Report delivery failed",
            ErrorCode::ReportFrequencyInvalid => "Report schedule frequency is invalid",
            ErrorCode::ReportFormatInvalid => "Report export format is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailNotConfigured => "Mail transport is not configured",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountBanned),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::ChefRequired),

            // Account
            3001 => Ok(ErrorCode::ProfileNotFound),
            3002 => Ok(ErrorCode::ChefNotFound),
            3003 => Ok(ErrorCode::SubscriptionExpired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyCompleted),
            4003 => Ok(ErrorCode::OrderEmpty),

            // Transaction
            5001 => Ok(ErrorCode::TransactionNotFound),
            5002 => Ok(ErrorCode::TransactionAlreadyApproved),
            5003 => Ok(ErrorCode::InsufficientBalance),

            // Food
            6001 => Ok(ErrorCode::FoodNotFound),
            6002 => Ok(ErrorCode::FoodInvalidPrice),

            // Campaign
            7001 => Ok(ErrorCode::CampaignNotFound),
            7002 => Ok(ErrorCode::CampaignNotRunning),
            7003 => Ok(ErrorCode::CampaignSoldOut),

            // Report
            8001 => Ok(ErrorCode::ReportRangeInvalid),
            8002 => Ok(ErrorCode::ReportRenderFailed),
            8003 => Ok(ErrorCode::ReportScheduleNotFound),
            8004 => Ok(ErrorCode::ReportDeliveryFailed),
            8005 => Ok(ErrorCode::ReportFrequencyInvalid),
            8006 => Ok(ErrorCode::ReportFormatInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::MailNotConfigured),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::ReportRangeInvalid.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotFound,
            ErrorCode::InvalidCredentials,
            ErrorCode::ChefNotFound,
            ErrorCode::ReportRangeInvalid,
            ErrorCode::ReportDeliveryFailed,
            ErrorCode::DatabaseError,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4444), Err(InvalidErrorCode(4444)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::ReportRangeInvalid).unwrap();
        assert_eq!(json, "8001");

        let code: ErrorCode = serde_json::from_str("1002").unwrap();
        assert_eq!(code, ErrorCode::InvalidCredentials);
    }
}
