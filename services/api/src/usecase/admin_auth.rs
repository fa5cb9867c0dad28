//! Admin authentication: password gate, second-factor code, refresh rotation
//! and logout.
//!
//! Admins never receive plain session tokens. A successful 2FA yields a short
//! lived JWT access token plus an opaque refresh token; the password step
//! alone yields nothing a client could authenticate with.

use chrono::Duration;
use uuid::Uuid;

use trenzo_auth_types::cookie::REFRESH_TOKEN_EXP;
use trenzo_auth_types::role::Role;

use crate::domain::repository::{
    AdminSessionRepository, Clock, DeliveryChannel, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{AdminSession, CodePurpose, User};
use crate::error::ApiError;
use crate::security;
use crate::usecase::otp;
use crate::usecase::token::{self, AdminTokenPair, RotateRefreshOutput, RotateRefreshUseCase};

pub struct InitiateAdminLoginUseCase<U, V, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    D: DeliveryChannel,
    C: Clock,
{
    pub users: U,
    pub codes: V,
    pub delivery: D,
    pub clock: C,
    pub fixed_codes: bool,
}

impl<U, V, D, C> InitiateAdminLoginUseCase<U, V, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    D: DeliveryChannel,
    C: Clock,
{
    /// Unknown account, wrong password and non-admin role all fail with the
    /// same error. On success only the user id comes back; the caller needs
    /// it to address the 2FA step.
    pub async fn execute(&self, identifier: &str, password: &str) -> Result<Uuid, ApiError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(ApiError::InvalidAdminCredentials)?;

        if !security::verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidAdminCredentials);
        }
        if user.role != Role::Admin {
            return Err(ApiError::InvalidAdminCredentials);
        }

        otp::issue_code(
            &self.codes,
            &self.delivery,
            &self.clock,
            user.id,
            user.contact_target(),
            CodePurpose::AdminAction,
            self.fixed_codes,
        )
        .await?;

        Ok(user.id)
    }
}

#[derive(Debug)]
pub struct AdminLoginOutput {
    pub user: User,
    pub pair: AdminTokenPair,
}

pub struct VerifyAdmin2faUseCase<U, V, S, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    pub users: U,
    pub codes: V,
    pub admin_sessions: S,
    pub clock: C,
    pub jwt_secret: String,
}

impl<U, V, S, C> VerifyAdmin2faUseCase<U, V, S, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<AdminLoginOutput, ApiError> {
        otp::validate_code(
            &self.codes,
            &self.clock,
            user_id,
            code,
            CodePurpose::AdminAction,
        )
        .await?;

        // Re-fetched after the code check: the account may have been demoted
        // or deleted between the two steps.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.role == Role::Admin)
            .ok_or(ApiError::AdminNoLongerExists)?;

        let now = self.clock.now();
        let pair = token::issue_admin_pair(user.id, user.role, &self.jwt_secret, now)?;
        self.admin_sessions
            .create(&AdminSession {
                id: Uuid::new_v4(),
                user_id: user.id,
                refresh_token: pair.refresh_token.clone(),
                expires_at: now + Duration::seconds(REFRESH_TOKEN_EXP as i64),
                created_at: now,
            })
            .await?;

        Ok(AdminLoginOutput { user, pair })
    }
}

pub struct RefreshAdminSessionUseCase<U, S, C>
where
    U: UserRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    inner: RotateRefreshUseCase<U, S, C>,
}

impl<U, S, C> RefreshAdminSessionUseCase<U, S, C>
where
    U: UserRepository,
    S: AdminSessionRepository,
    C: Clock,
{
    pub fn new(users: U, admin_sessions: S, clock: C, jwt_secret: String) -> Self {
        Self {
            inner: RotateRefreshUseCase {
                users,
                admin_sessions,
                clock,
                jwt_secret,
            },
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> Result<RotateRefreshOutput, ApiError> {
        self.inner.execute(refresh_token).await
    }
}

pub struct AdminLogoutUseCase<S: AdminSessionRepository> {
    pub admin_sessions: S,
}

impl<S: AdminSessionRepository> AdminLogoutUseCase<S> {
    /// Idempotent, same contract as user logout. The access token stays valid
    /// until its exp; only the refresh side is revocable.
    pub async fn execute(&self, refresh_token: &str) -> Result<(), ApiError> {
        self.admin_sessions.delete_by_token(refresh_token).await
    }
}
