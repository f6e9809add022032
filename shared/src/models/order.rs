//! Order & Allocation Models

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Point-consuming order (兑换订单)
///
/// `used_points` is derived from the order's allocation records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub member_id: String,
    pub title: String,
    pub used_points: i64,
    pub created_at: i64,
}

/// Persisted link between an order and a batch it consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AllocationRecord {
    pub order_id: i64,
    pub batch_id: i64,
    pub points: i64,
}

/// Order with its allocation records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub allocations: Vec<AllocationRecord>,
}

/// One step of an allocation plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub batch_id: i64,
    pub points_consumed: i64,
}

/// Ordered distribution of a deduction across batches
///
/// Transient: computed against a snapshot, submitted to the gateway,
/// never stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub entries: Vec<AllocationEntry>,
}

impl AllocationPlan {
    pub fn total(&self) -> i64 {
        self.entries
            .iter()
            .map(|e| e.points_consumed)
            .fold(0i64, i64::saturating_add)
    }

    /// Structural check before commit: non-empty, positive amounts, each
    /// batch named at most once.
    pub fn validate(&self) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("allocation plan is empty".to_string());
        }
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if entry.points_consumed <= 0 {
                return Err(format!(
                    "batch {} allocated non-positive points {}",
                    entry.batch_id, entry.points_consumed
                ));
            }
            if !seen.insert(entry.batch_id) {
                return Err(format!("batch {} appears twice in plan", entry.batch_id));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AllocationEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a AllocationPlan {
    type Item = &'a AllocationEntry;
    type IntoIter = std::slice::Iter<'a, AllocationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Allocation commit payload handed to the gateway
///
/// `checked_at` is the instant the plan was computed for; the gateway
/// re-validates expiry against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCommit {
    pub member_id: String,
    pub title: String,
    pub checked_at: i64,
    pub plan: AllocationPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_total() {
        let plan = AllocationPlan {
            entries: vec![
                AllocationEntry {
                    batch_id: 2,
                    points_consumed: 5,
                },
                AllocationEntry {
                    batch_id: 1,
                    points_consumed: 7,
                },
            ],
        };
        assert_eq!(plan.total(), 12);
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.iter().map(|e| e.batch_id).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[test]
    fn test_plan_total_saturates() {
        let plan = AllocationPlan {
            entries: vec![
                AllocationEntry {
                    batch_id: 1,
                    points_consumed: i64::MAX,
                },
                AllocationEntry {
                    batch_id: 2,
                    points_consumed: i64::MAX,
                },
            ],
        };
        assert_eq!(plan.total(), i64::MAX);
    }

    #[test]
    fn test_empty_plan() {
        let plan = AllocationPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.total(), 0);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_validate_plan() {
        let plan = |entries: &[(i64, i64)]| AllocationPlan {
            entries: entries
                .iter()
                .map(|&(batch_id, points_consumed)| AllocationEntry {
                    batch_id,
                    points_consumed,
                })
                .collect(),
        };
        assert!(plan(&[(2, 5), (1, 7)]).validate().is_ok());
        assert!(plan(&[(1, 6), (1, 6)]).validate().is_err());
        assert!(plan(&[(1, 0)]).validate().is_err());
        assert!(plan(&[(1, -3)]).validate().is_err());
    }
}
