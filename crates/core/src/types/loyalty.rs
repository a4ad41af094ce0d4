//! Customer loyalty tiers.

use serde::{Deserialize, Serialize};

/// Points needed to reach Silver.
pub const SILVER_THRESHOLD: i64 = 500;
/// Points needed to reach Gold.
pub const GOLD_THRESHOLD: i64 = 1500;

/// Loyalty tier, derived from cumulative points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "mall.loyalty_tier", rename_all = "PascalCase")
)]
pub enum LoyaltyTier {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl LoyaltyTier {
    /// Tier for a cumulative point balance.
    ///
    /// ```rust
    /// # use queens_mall_core::LoyaltyTier;
    /// assert_eq!(LoyaltyTier::for_points(499), LoyaltyTier::Bronze);
    /// assert_eq!(LoyaltyTier::for_points(500), LoyaltyTier::Silver);
    /// assert_eq!(LoyaltyTier::for_points(1500), LoyaltyTier::Gold);
    /// ```
    #[must_use]
    pub const fn for_points(points: i64) -> Self {
        if points >= GOLD_THRESHOLD {
            Self::Gold
        } else if points >= SILVER_THRESHOLD {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(LoyaltyTier::for_points(0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_points(499), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_points(500), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_points(1499), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_points(1500), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::for_points(i64::MAX), LoyaltyTier::Gold);
    }

    #[test]
    fn test_tier_is_recomputed_from_total() {
        // 0 prior points plus a 600 unit order lands in Silver
        assert_eq!(LoyaltyTier::for_points(600), LoyaltyTier::Silver);
        // a further 900 units crosses into Gold
        assert_eq!(LoyaltyTier::for_points(600 + 900), LoyaltyTier::Gold);
    }
}
