//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AllocationConflict => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable (request is well-formed, ledger state refuses it)
            Self::PointsInsufficient => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::DatabaseError | Self::PointBatchCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::PointsInvalidAmount => StatusCode::BAD_REQUEST,
        }
    }
}
