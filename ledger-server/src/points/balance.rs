//! Usable balance
//!
//! The balance is always re-derived from raw batch state; no running total
//! is kept anywhere.

use shared::models::PointBatch;

/// Sum of remaining points over batches still usable at `now`.
///
/// `ended_at` is inclusive: a batch expiring exactly at `now` still counts.
/// Saturates at `i64::MAX` for oversized stored batches.
pub fn usable_balance(batches: &[PointBatch], now: i64) -> i64 {
    batches
        .iter()
        .filter(|b| b.is_usable_at(now))
        .map(PointBatch::remaining)
        .fold(0i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_790_000_000_000;
    const DAY: i64 = 86_400_000;

    fn batch(id: i64, points: i64, used_points: i64, ended_at: i64) -> PointBatch {
        PointBatch {
            id,
            member_id: "m-1".to_string(),
            title: format!("batch {}", id),
            points,
            used_points,
            ended_at,
            created_at: 0,
        }
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(usable_balance(&[], NOW), 0);
    }

    #[test]
    fn test_sums_remaining_of_live_batches() {
        let batches = vec![
            batch(1, 10, 0, NOW + DAY),
            batch(2, 5, 2, NOW + 2 * DAY),
            batch(3, 8, 8, NOW + DAY),
        ];
        assert_eq!(usable_balance(&batches, NOW), 13);
    }

    #[test]
    fn test_expired_batches_excluded() {
        let batches = vec![batch(1, 10, 0, NOW + DAY), batch(2, 50, 0, NOW - DAY)];
        assert_eq!(usable_balance(&batches, NOW), 10);
    }

    #[test]
    fn test_boundary_inclusive() {
        let at_now = vec![batch(1, 10, 0, NOW)];
        assert_eq!(usable_balance(&at_now, NOW), 10);

        let one_ms_ago = vec![batch(1, 10, 0, NOW - 1)];
        assert_eq!(usable_balance(&one_ms_ago, NOW), 0);
    }

    #[test]
    fn test_invariant_under_reordering() {
        let mut batches = vec![
            batch(1, 10, 3, NOW + DAY),
            batch(2, 5, 0, NOW - 1),
            batch(3, 7, 1, NOW),
            batch(4, 20, 19, NOW + 3 * DAY),
        ];
        let expected = usable_balance(&batches, NOW);
        assert_eq!(expected, 7 + 6 + 1);

        batches.reverse();
        assert_eq!(usable_balance(&batches, NOW), expected);
        batches.rotate_left(1);
        assert_eq!(usable_balance(&batches, NOW), expected);
    }

    #[test]
    fn test_repeated_calls_identical() {
        let batches = vec![batch(1, 10, 3, NOW + DAY), batch(2, 4, 0, NOW)];
        let snapshot = batches.clone();
        let first = usable_balance(&batches, NOW);
        let second = usable_balance(&batches, NOW);
        assert_eq!(first, second);
        assert_eq!(batches, snapshot);
    }

    #[test]
    fn test_huge_batches_saturate() {
        let batches = vec![
            batch(1, i64::MAX, 0, NOW + DAY),
            batch(2, i64::MAX, 0, NOW + DAY),
            batch(3, 1, 0, NOW),
        ];
        assert_eq!(usable_balance(&batches, NOW), i64::MAX);
    }

    #[test]
    fn test_corrupt_batch_never_negative() {
        let batches = vec![batch(1, 10, 0, NOW + DAY), batch(2, 5, 9, NOW + DAY)];
        assert_eq!(usable_balance(&batches, NOW), 10);
    }
}
