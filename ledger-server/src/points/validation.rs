//! Snapshot and amount checks

use std::collections::HashSet;

use shared::models::PointBatch;

use super::PointsError;

/// Largest amount a single grant or deduction may carry
pub const MAX_POINTS_AMOUNT: i64 = 1_000_000_000;

/// Grant and deduction amounts must lie in `1..=MAX_POINTS_AMOUNT`
pub fn validate_amount(amount: i64) -> Result<(), PointsError> {
    if !(1..=MAX_POINTS_AMOUNT).contains(&amount) {
        return Err(PointsError::InvalidAmount(amount));
    }
    Ok(())
}

/// Check a single batch against `0 <= used_points <= points`
pub fn validate_batch(batch: &PointBatch) -> Result<(), PointsError> {
    if batch.points < 0 {
        return Err(PointsError::CorruptBatch {
            batch_id: batch.id,
            reason: format!("negative points {}", batch.points),
        });
    }
    if batch.used_points < 0 || batch.used_points > batch.points {
        return Err(PointsError::CorruptBatch {
            batch_id: batch.id,
            reason: format!("used {} of {} points", batch.used_points, batch.points),
        });
    }
    Ok(())
}

/// Check a member snapshot before planning against it.
///
/// Every batch must be well-formed, belong to `member_id`, and appear once.
pub fn validate_snapshot(member_id: &str, batches: &[PointBatch]) -> Result<(), PointsError> {
    let mut seen = HashSet::with_capacity(batches.len());
    for batch in batches {
        validate_batch(batch)?;
        if batch.member_id != member_id {
            return Err(PointsError::CorruptBatch {
                batch_id: batch.id,
                reason: format!(
                    "belongs to member {}, expected {}",
                    batch.member_id, member_id
                ),
            });
        }
        if !seen.insert(batch.id) {
            return Err(PointsError::CorruptBatch {
                batch_id: batch.id,
                reason: "duplicated in snapshot".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: i64, member_id: &str, points: i64, used_points: i64) -> PointBatch {
        PointBatch {
            id,
            member_id: member_id.to_string(),
            title: "grant".to_string(),
            points,
            used_points,
            ended_at: 0,
            created_at: 0,
        }
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(1).is_ok());
        assert_eq!(validate_amount(0), Err(PointsError::InvalidAmount(0)));
        assert_eq!(validate_amount(-5), Err(PointsError::InvalidAmount(-5)));
        assert!(validate_amount(MAX_POINTS_AMOUNT).is_ok());
        assert_eq!(
            validate_amount(MAX_POINTS_AMOUNT + 1),
            Err(PointsError::InvalidAmount(MAX_POINTS_AMOUNT + 1))
        );
        assert_eq!(
            validate_amount(i64::MAX),
            Err(PointsError::InvalidAmount(i64::MAX))
        );
    }

    #[test]
    fn test_validate_batch() {
        assert!(validate_batch(&batch(1, "m", 10, 10)).is_ok());
        assert!(validate_batch(&batch(1, "m", 0, 0)).is_ok());
        assert!(matches!(
            validate_batch(&batch(1, "m", 10, 11)),
            Err(PointsError::CorruptBatch { batch_id: 1, .. })
        ));
        assert!(validate_batch(&batch(1, "m", 10, -1)).is_err());
        assert!(validate_batch(&batch(1, "m", -3, 0)).is_err());
    }

    #[test]
    fn test_validate_snapshot_rejects_foreign_member() {
        let batches = vec![batch(1, "m-1", 10, 0), batch(2, "m-2", 10, 0)];
        let err = validate_snapshot("m-1", &batches).unwrap_err();
        assert!(matches!(err, PointsError::CorruptBatch { batch_id: 2, .. }));
    }

    #[test]
    fn test_validate_snapshot_rejects_duplicates() {
        let batches = vec![batch(1, "m-1", 10, 0), batch(1, "m-1", 10, 0)];
        assert!(validate_snapshot("m-1", &batches).is_err());
    }

    #[test]
    fn test_validate_snapshot_empty() {
        assert!(validate_snapshot("m-1", &[]).is_ok());
    }
}
