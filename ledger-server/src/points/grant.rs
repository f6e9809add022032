//! Grant request construction

use chrono_tz::Tz;
use shared::models::GrantRequest;

use super::PointsError;
use super::validation::validate_amount;
use crate::utils::time::end_of_day_millis;

/// Build the creation request for one new batch.
///
/// Without an explicit `ended_at` the batch expires at the last millisecond
/// of `now`'s day in the business time zone `tz`.
pub fn grant(
    member_id: &str,
    title: &str,
    points: i64,
    ended_at: Option<i64>,
    now: i64,
    tz: Tz,
) -> Result<GrantRequest, PointsError> {
    validate_amount(points)?;

    Ok(GrantRequest {
        member_id: member_id.to_string(),
        title: title.to_string(),
        points,
        ended_at: ended_at.unwrap_or_else(|| end_of_day_millis(now, tz)),
    })
}
