//! # Loyalty Program
//!
//! One point per whole R$ 10 of a sale's total; points buy percentage
//! discounts on a later sale.
//!
//! | Points | Discount |
//! |--------|----------|
//! | 50     | 5 %      |
//! | 100    | 10 %     |
//! | 200    | 15 %     |
//! | 300    | 20 %     |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Centavos per loyalty point.
pub const CENTS_PER_POINT: i64 = 1000;

/// A redeemable reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub points: i64,
    pub discount_percent: u32,
}

pub const REWARD_TIERS: [RewardTier; 4] = [
    RewardTier { points: 50, discount_percent: 5 },
    RewardTier { points: 100, discount_percent: 10 },
    RewardTier { points: 200, discount_percent: 15 },
    RewardTier { points: 300, discount_percent: 20 },
];

/// `floor(total / 10 reais)`; zero for non-positive totals.
pub fn points_earned(total: Money) -> i64 {
    if total.is_negative() {
        return 0;
    }
    total.cents() / CENTS_PER_POINT
}

/// Tiers a balance of `points` can pay for, cheapest first.
pub fn available_rewards(points: i64) -> Vec<RewardTier> {
    REWARD_TIERS
        .iter()
        .copied()
        .filter(|tier| tier.points <= points)
        .collect()
}

/// The cheapest tier not yet reachable, if any.
pub fn next_reward(points: i64) -> Option<RewardTier> {
    REWARD_TIERS.iter().copied().find(|tier| tier.points > points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_earned_floors() {
        assert_eq!(points_earned(Money::from_cents(999)), 0);
        assert_eq!(points_earned(Money::from_cents(1000)), 1);
        assert_eq!(points_earned(Money::from_cents(5499)), 5);
        assert_eq!(points_earned(Money::zero()), 0);
        assert_eq!(points_earned(Money::from_cents(-5000)), 0);
    }

    #[test]
    fn test_available_rewards() {
        assert!(available_rewards(49).is_empty());
        assert_eq!(available_rewards(100).len(), 2);
        assert_eq!(available_rewards(1000).len(), 4);
        assert!(available_rewards(-20).is_empty());
    }

    #[test]
    fn test_next_reward() {
        assert_eq!(next_reward(0).map(|t| t.points), Some(50));
        assert_eq!(next_reward(150).map(|t| t.discount_percent), Some(15));
        assert_eq!(next_reward(300), None);
    }
}
