//! Order lifecycle.
//!
//! ```text
//! Pending ──(delivery deadline passed)──► Expired
//!    │
//!    ├──(tenant action)──► Completed
//!    └──(tenant action)──► Cancelled
//! ```
//!
//! Expired, Completed and Cancelled are final.

use serde::{Deserialize, Serialize};

/// Error returned when an order status name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct OrderStatusError(pub String);

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "mall.order_status", rename_all = "PascalCase")
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Expired,
}

impl OrderStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    /// No transition leaves a final status.
    #[must_use]
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Statuses a tenant may set on an order containing their products.
    #[must_use]
    pub const fn is_tenant_settable(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self -> next` is an allowed transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed | Self::Cancelled | Self::Expired)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            "Expired" => Ok(Self::Expired),
            _ => Err(OrderStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        let pending = OrderStatus::Pending;
        assert!(pending.can_transition_to(OrderStatus::Completed));
        assert!(pending.can_transition_to(OrderStatus::Cancelled));
        assert!(pending.can_transition_to(OrderStatus::Expired));
        assert!(!pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_nothing_leaves_expired() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Expired,
        ] {
            assert!(!OrderStatus::Expired.can_transition_to(next));
        }
        assert!(OrderStatus::Expired.is_final());
    }

    #[test]
    fn test_tenant_settable() {
        assert!(OrderStatus::Completed.is_tenant_settable());
        assert!(OrderStatus::Cancelled.is_tenant_settable());
        assert!(!OrderStatus::Expired.is_tenant_settable());
        assert!(!OrderStatus::Pending.is_tenant_settable());
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Completed".parse(), Ok(OrderStatus::Completed));
        assert!("completed".parse::<OrderStatus>().is_err());
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }
}
