//! Request identity extractors.
//!
//! Two gates for two credential shapes. `AccessIdentity` verifies an admin
//! JWT statelessly; `SessionIdentity` resolves an opaque session token
//! against the store and therefore sees revocation immediately.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use trenzo_auth_types::cookie::TRENZO_SESSION;
use trenzo_auth_types::role::Role;
use trenzo_auth_types::token::{TokenInfo, validate_access_token};

use crate::domain::repository::{Clock as _, SessionRepository as _, UserRepository as _};
use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Token from an `Authorization: Bearer ...` header, if present. Shared with
/// the logout handlers, which accept the same credential shapes as the gates.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Stateless admin identity from a JWT access token.
#[derive(Debug, Clone)]
pub struct AccessIdentity(pub TokenInfo);

impl AccessIdentity {
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for AccessIdentity {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let jwt_secret = state.jwt_secret.clone();

        async move {
            let token = token.ok_or(ApiError::Unauthenticated)?;
            let info = validate_access_token(&token, &jwt_secret)
                .map_err(|_| ApiError::Unauthenticated)?;
            Ok(Self(info))
        }
    }
}

/// Store-backed user identity from an opaque session token, taken from the
/// session cookie or a bearer header.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TRENZO_SESSION)
            .map(|c| c.value().to_owned())
            .or_else(|| bearer_token(&parts.headers));
        let state = state.clone();

        async move {
            let token = token.ok_or(ApiError::Unauthenticated)?;
            let session = state
                .session_repo()
                .find_by_token(&token)
                .await?
                .ok_or(ApiError::Unauthenticated)?;

            if session.expires_at <= state.clock().now() {
                // Expiry detected on use: drop the dead row, then reject.
                state.session_repo().delete_by_token(&token).await?;
                return Err(ApiError::Unauthenticated);
            }

            let user = state
                .user_repo()
                .find_by_id(session.user_id)
                .await?
                .ok_or(ApiError::Unauthenticated)?;

            Ok(Self { user, token })
        }
    }
}
