//! Bearer token extractors.
//!
//! [`AuthUser`] turns the `Authorization: Bearer <token>` header into one
//! fixed identity shape. The `Require*` extractors add a role check on top.
//!
//! ```rust,ignore
//! async fn handler(RequireTenant(user): RequireTenant) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use queens_mall_core::{Role, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Identity carried by a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_owned()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid token: expected a Bearer token".to_owned())
            })?;

        let claims = state.tokens().verify(token)?;

        Ok(Self {
            id: claims.user_id()?,
            role: claims.role,
            username: claims.username,
        })
    }
}

fn require(user: AuthUser, allowed: impl Fn(Role) -> bool) -> Result<AuthUser, AppError> {
    if allowed(user.role) {
        Ok(user)
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, "Role check failed");
        Err(AppError::Forbidden("Unauthorized".to_owned()))
    }
}

macro_rules! role_extractor {
    ($(#[$doc:meta])* $name:ident, $allowed:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                require(user, $allowed).map(Self)
            }
        }
    };
}

role_extractor!(
    /// Requires an admin token.
    RequireAdmin,
    |role| matches!(role, Role::Admin)
);

role_extractor!(
    /// Requires a tenant token.
    RequireTenant,
    |role| matches!(role, Role::Tenant)
);

role_extractor!(
    /// Requires a customer token.
    RequireCustomer,
    |role| matches!(role, Role::Customer)
);

role_extractor!(
    /// Requires an admin or tenant token.
    RequireStaff,
    Role::is_staff
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use chrono::Utc;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{MallConfig, TEST_JWT_SECRET, TokenConfig};
    use crate::models::user::User;
    use crate::services::TokenService;

    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/queens_mall_test")
            .unwrap();
        AppState::new(MallConfig::for_tests(), pool)
    }

    fn token_for(state: &AppState, role: Role) -> String {
        let user = User {
            id: UserId::new(3),
            username: "lee".to_owned(),
            email: "lee@example.com".to_owned(),
            role,
            created_at: Utc::now(),
        };
        state.tokens().issue(&user).unwrap()
    }

    async fn whoami(user: AuthUser) -> String {
        format!("{}:{}", user.id, user.role)
    }

    async fn tenant_only(RequireTenant(user): RequireTenant) -> String {
        user.username
    }

    async fn staff_only(RequireStaff(user): RequireStaff) -> String {
        user.username
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route("/tenant", get(tenant_only))
            .route("/staff", get(staff_only))
            .with_state(state)
    }

    async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let (status, body) = call(app(state()), "/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing authorization header"));
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let (status, body) = call(app(state()), "/me", Some("nonsense")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
    }

    #[tokio::test]
    async fn test_expired_token_is_401() {
        let state = state();
        let expired = TokenService::new(&TokenConfig {
            secret: SecretString::from(TEST_JWT_SECRET),
            ttl: chrono::Duration::seconds(-120),
        });
        let user = User {
            id: UserId::new(3),
            username: "lee".to_owned(),
            email: "lee@example.com".to_owned(),
            role: Role::Customer,
            created_at: Utc::now(),
        };
        let token = expired.issue(&user).unwrap();

        let (status, body) = call(app(state), "/me", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token has expired"));
    }

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let state = state();
        let token = token_for(&state, Role::Customer);
        let (status, body) = call(app(state), "/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "3:customer");
    }

    #[tokio::test]
    async fn test_wrong_role_is_403() {
        let state = state();
        let token = token_for(&state, Role::Customer);
        let (status, _) = call(app(state), "/tenant", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_staff_accepts_admin_and_tenant() {
        let state = state();
        for role in [Role::Admin, Role::Tenant] {
            let token = token_for(&state, role);
            let (status, body) = call(app(state.clone()), "/staff", Some(&token)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "lee");
        }
    }
}
