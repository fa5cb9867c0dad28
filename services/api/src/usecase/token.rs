//! Token minting and admin refresh rotation.
//!
//! Two credential shapes, deliberately unalike: opaque random tokens backed
//! by a store row (user sessions, admin refresh tokens) and signed JWTs
//! verified statelessly (admin access tokens).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::RngExt;
use uuid::Uuid;

use trenzo_auth_types::cookie::REFRESH_TOKEN_EXP;
use trenzo_auth_types::role::Role;
use trenzo_auth_types::token::{ACCESS_TOKEN_EXP, JwtClaims};

use crate::domain::repository::{AdminSessionRepository, Clock, UserRepository};
use crate::domain::types::{AdminSession, REFRESH_TOKEN_BYTES, SESSION_TOKEN_BYTES, User};
use crate::error::ApiError;

/// Hex-encode `n` bytes from the thread-local CSPRNG.
fn random_hex(n: usize) -> String {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; n];
    rng.fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Opaque user session token: 48 random bytes, hex-encoded.
/// Unguessability is its only security property.
pub fn new_session_token() -> String {
    random_hex(SESSION_TOKEN_BYTES)
}

/// Opaque admin refresh token: 40 random bytes, hex-encoded.
pub fn new_refresh_token() -> String {
    random_hex(REFRESH_TOKEN_BYTES)
}

/// Mint a signed access token embedding user id and role, valid 15 minutes.
/// Pure function of identity — no persistence.
pub fn issue_access_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<(String, u64), ApiError> {
    let exp = now.timestamp() as u64 + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Access + refresh pair for an admin.
#[derive(Debug)]
pub struct AdminTokenPair {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Mint an admin pair. Does not persist — the refresh token's persistence is
/// the caller's responsibility, so 2FA success and refresh rotation share
/// this minting path.
pub fn issue_admin_pair(
    user_id: Uuid,
    role: Role,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<AdminTokenPair, ApiError> {
    let (access_token, access_token_exp) = issue_access_token(user_id, role, secret, now)?;
    Ok(AdminTokenPair {
        access_token,
        access_token_exp,
        refresh_token: new_refresh_token(),
    })
}

// ── Refresh rotation ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RotateRefreshOutput {
    pub user: User,
    pub pair: AdminTokenPair,
}

pub struct RotateRefreshUseCase<U, S, C>
where
    U: UserRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    pub users: U,
    pub admin_sessions: S,
    pub clock: C,
    pub jwt_secret: String,
}

impl<U, S, C> RotateRefreshUseCase<U, S, C>
where
    U: UserRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    /// Rotate a refresh token: the old one becomes permanently invalid the
    /// instant a new pair is issued, limiting a stolen token to one use.
    pub async fn execute(&self, old_token: &str) -> Result<RotateRefreshOutput, ApiError> {
        let session = self
            .admin_sessions
            .find_by_token(old_token)
            .await?
            .ok_or(ApiError::SessionExpired)?;

        let now = self.clock.now();
        if session.expires_at <= now {
            // Expiry detected on use: drop the dead row, then fail.
            self.admin_sessions.delete_by_token(old_token).await?;
            return Err(ApiError::SessionExpired);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(ApiError::SessionExpired)?;

        self.admin_sessions.delete_by_token(old_token).await?;

        let pair = issue_admin_pair(user.id, user.role, &self.jwt_secret, now)?;
        self.admin_sessions
            .create(&AdminSession {
                id: Uuid::new_v4(),
                user_id: user.id,
                refresh_token: pair.refresh_token.clone(),
                expires_at: now + Duration::seconds(REFRESH_TOKEN_EXP as i64),
                created_at: now,
            })
            .await?;

        Ok(RotateRefreshOutput { user, pair })
    }
}
