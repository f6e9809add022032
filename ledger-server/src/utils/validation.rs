//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so handlers check here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Batch and order titles
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: member id
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Member ids arrive as path segments
pub fn validate_member_id(member_id: &str) -> Result<(), AppError> {
    validate_required_text(member_id, "member_id", MAX_SHORT_TEXT_LEN)
}
