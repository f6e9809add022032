//! Unified error codes for the point ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Points errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so API consumers can match on plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Admin secret missing
    NotAuthenticated = 1001,
    /// Admin secret does not match
    InvalidCredentials = 1002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,

    // ==================== 5xxx: Points ====================
    /// Usable balance is lower than the requested deduction
    PointsInsufficient = 5001,
    /// Grant or deduction amount is not positive or exceeds the per-request cap
    PointsInvalidAmount = 5002,
    /// Batch state changed between planning and commit
    AllocationConflict = 5003,
    /// Stored batch violates used_points <= points
    PointBatchCorrupted = 5005,

    // ==================== 9xxx: System ====================
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "Admin secret required",
            ErrorCode::InvalidCredentials => "Invalid admin secret",

            // Order
            ErrorCode::OrderNotFound => "Order not found",

            // Points
            ErrorCode::PointsInsufficient => "Insufficient points",
            ErrorCode::PointsInvalidAmount => "Points amount is out of range",
            ErrorCode::AllocationConflict => "Point balance changed, please retry",
            ErrorCode::PointBatchCorrupted => "Point batch state is inconsistent",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

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
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),

            // Points
            5001 => Ok(ErrorCode::PointsInsufficient),
            5002 => Ok(ErrorCode::PointsInvalidAmount),
            5003 => Ok(ErrorCode::AllocationConflict),
            5005 => Ok(ErrorCode::PointBatchCorrupted),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::InvalidRequest,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::OrderNotFound,
        ErrorCode::PointsInsufficient,
        ErrorCode::PointsInvalidAmount,
        ErrorCode::AllocationConflict,
        ErrorCode::PointBatchCorrupted,
        ErrorCode::DatabaseError,
    ];

    #[test]
    fn test_every_code_converts_back() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::PointsInsufficient).unwrap();
        assert_eq!(json, "5001");
        let code: ErrorCode = serde_json::from_str("5003").unwrap();
        assert_eq!(code, ErrorCode::AllocationConflict);
    }
}
