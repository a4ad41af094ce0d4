//! Bearer token issuance and validation (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use queens_mall_core::{Role, UserId};

use crate::config::TokenConfig;
use crate::models::user::User;

/// JWT claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's numeric ID, as a string.
    pub sub: String,
    pub role: Role,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Parse the subject back into an account ID.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if `sub` is not a numeric ID.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::Invalid("subject is not an account id".to_owned()))
    }
}

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: config.ttl,
        }
    }

    /// Issue an access token for an authenticated account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::MallConfig;

    fn service() -> TokenService {
        TokenService::new(&MallConfig::for_tests().tokens)
    }

    fn user(role: Role) -> User {
        User {
            id: UserId::new(42),
            username: "dana".to_owned(),
            email: "dana@example.com".to_owned(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let token = tokens.issue(&user(Role::Tenant)).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
        assert_eq!(claims.role, Role::Tenant);
        assert_eq!(claims.username, "dana");
        assert_eq!(claims.exp - claims.iat, 5 * 3600);
    }

    #[test]
    fn test_expired_token_is_distinct() {
        let config = TokenConfig {
            secret: SecretString::from(crate::config::TEST_JWT_SECRET),
            ttl: chrono::Duration::seconds(-120),
        };
        let tokens = TokenService::new(&config);
        let token = tokens.issue(&user(Role::Customer)).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_invalid() {
        assert!(matches!(
            service().verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_foreign_signature_invalid() {
        let other = TokenService::new(&TokenConfig {
            secret: SecretString::from("Zq8#Lm2!Wx5@Rt7$Yp1%Hv4^Nc6&Bk9*"),
            ttl: chrono::Duration::hours(1),
        });
        let token = other.issue(&user(Role::Admin)).unwrap();

        assert!(matches!(
            service().verify(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "dana".to_owned(),
            role: Role::Customer,
            username: "dana".to_owned(),
            iat: 0,
            exp: 0,
            jti: String::new(),
        };
        assert!(matches!(claims.user_id(), Err(TokenError::Invalid(_))));
    }
}
