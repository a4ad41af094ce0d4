//! User roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// The role a user account acts under.
///
/// Every account has exactly one role. Admin accounts can only be created
/// from the CLI; self-registration accepts `tenant` and `customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "mall.user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Mall operator: approves shops and sees dashboards.
    Admin,
    /// Shop owner.
    Tenant,
    /// Shopper.
    #[default]
    Customer,
}

impl Role {
    /// The lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Tenant => "tenant",
            Self::Customer => "customer",
        }
    }

    /// Whether this role may be chosen at self-registration.
    #[must_use]
    pub const fn is_self_registrable(self) -> bool {
        matches!(self, Self::Tenant | Self::Customer)
    }

    /// Whether this role may manage events.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Tenant)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "tenant" => Ok(Self::Tenant),
            "customer" => Ok(Self::Customer),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Tenant".parse::<Role>().unwrap(), Role::Tenant);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_self_registration() {
        assert!(!Role::Admin.is_self_registrable());
        assert!(Role::Tenant.is_self_registrable());
        assert!(Role::Customer.is_self_registrable());
    }

    #[test]
    fn test_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Tenant.is_staff());
        assert!(!Role::Customer.is_staff());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tenant).unwrap(), "\"tenant\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }
}
