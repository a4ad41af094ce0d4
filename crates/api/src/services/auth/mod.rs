//! Authentication service.
//!
//! Password registration and login. Tokens are issued separately by
//! [`TokenService`](crate::services::tokens::TokenService) once a login
//! succeeds.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use queens_mall_core::limits;
use queens_mall_core::{Email, Role, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw registration fields as submitted by a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registration<'r> {
    pub username: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    /// Requested role; `None` registers a customer.
    pub role: Option<&'r str>,
    pub shop_name: Option<&'r str>,
    pub category: Option<&'r str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a tenant or customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RoleNotAllowed` when `admin` is requested.
    /// Returns `AuthError::UnknownRole` for an unrecognised role.
    /// Returns `AuthError::InvalidUsername`, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for bad input.
    /// Returns `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        let role = parse_requested_role(registration.role)?;
        self.create_account(registration, role).await
    }

    /// Create an admin account. Only reachable from operator tooling.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`], minus the role checks.
    pub async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let registration = Registration {
            username,
            email,
            password,
            ..Registration::default()
        };
        self.create_account(registration, Role::Admin).await
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    async fn create_account(
        &self,
        registration: Registration<'_>,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = Username::parse(registration.username)?;
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;
        limits::check_opt_len(
            "shop_name",
            registration.shop_name.map(str::trim),
            limits::SHOP_NAME,
        )?;
        limits::check_opt_len(
            "category",
            registration.category.map(str::trim),
            limits::CATEGORY,
        )?;

        let new_user = NewUser {
            username,
            email,
            password_hash: hash_password(registration.password)?,
            role,
            shop_name: registration.shop_name.map(str::to_owned),
            category: registration.category.map(str::to_owned),
        };

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");

        Ok(user)
    }
}

/// Resolve the role asked for at registration.
fn parse_requested_role(requested: Option<&str>) -> Result<Role, AuthError> {
    let role = match requested.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::default(),
    };

    if !role.is_self_registrable() {
        return Err(AuthError::RoleNotAllowed);
    }

    Ok(role)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_registers_customer() {
        assert_eq!(parse_requested_role(None).unwrap(), Role::Customer);
        assert_eq!(parse_requested_role(Some("  ")).unwrap(), Role::Customer);
    }

    #[test]
    fn test_tenant_role_allowed() {
        assert_eq!(parse_requested_role(Some("tenant")).unwrap(), Role::Tenant);
    }

    #[test]
    fn test_admin_role_refused() {
        assert!(matches!(
            parse_requested_role(Some("admin")),
            Err(AuthError::RoleNotAllowed)
        ));
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(matches!(
            parse_requested_role(Some("superuser")),
            Err(AuthError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_corrupt_hash_is_hash_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHash)
        ));
    }
}
