//! User-facing authentication: registration, login, OTP verification and
//! session logout.

use chrono::Duration;
use uuid::Uuid;

use trenzo_auth_types::cookie::SESSION_EXP;
use trenzo_auth_types::role::Role;

use crate::domain::repository::{
    Clock, DeliveryChannel, SessionRepository, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{CodePurpose, Session, User};
use crate::error::ApiError;
use crate::security;
use crate::usecase::otp;

#[derive(Debug)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    /// False when the account was created but code delivery could not even be
    /// attempted. The account stands either way.
    pub code_issued: bool,
}

pub struct RegisterUseCase<U, V, D, C>
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

impl<U, V, D, C> RegisterUseCase<U, V, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    D: DeliveryChannel,
    C: Clock,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, ApiError> {
        if self
            .users
            .find_by_email_or_phone(&input.email, input.phone.as_deref())
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateIdentity);
        }

        let password_hash = security::hash_password(&input.password)?;
        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            password_hash,
            role: Role::User,
            is_verified: false,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        // Partial success: a failed code issue must not unwind the account.
        let code_issued = match otp::issue_code(
            &self.codes,
            &self.delivery,
            &self.clock,
            user.id,
            user.contact_target(),
            CodePurpose::Signup,
            self.fixed_codes,
        )
        .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(user_id = %user.id, "signup code issue failed: {e}");
                false
            }
        };

        Ok(RegisterOutput { user, code_issued })
    }
}

#[derive(Debug)]
pub enum LoginOutput {
    /// Account exists but is unverified. A fresh code has been issued; no
    /// session is created.
    PendingVerification { user: User },
    Authenticated { user: User, session_token: String },
}

pub struct LoginUseCase<U, V, S, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
    D: DeliveryChannel,
    C: Clock,
{
    pub users: U,
    pub codes: V,
    pub sessions: S,
    pub delivery: D,
    pub clock: C,
    pub fixed_codes: bool,
}

impl<U, V, S, D, C> LoginUseCase<U, V, S, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
    D: DeliveryChannel,
    C: Clock,
{
    /// Unknown identifier and wrong password fail identically so the response
    /// leaks nothing about which accounts exist.
    pub async fn execute(&self, identifier: &str, password: &str) -> Result<LoginOutput, ApiError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !security::verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        if !user.is_verified {
            if let Err(e) = otp::issue_code(
                &self.codes,
                &self.delivery,
                &self.clock,
                user.id,
                user.contact_target(),
                CodePurpose::Signup,
                self.fixed_codes,
            )
            .await
            {
                tracing::warn!(user_id = %user.id, "login-time code issue failed: {e}");
            }
            return Ok(LoginOutput::PendingVerification { user });
        }

        let session_token = mint_session(&self.sessions, &self.clock, user.id).await?;
        Ok(LoginOutput::Authenticated {
            user,
            session_token,
        })
    }
}

pub struct VerifyOtpUseCase<U, V, S, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
    C: Clock,
{
    pub users: U,
    pub codes: V,
    pub sessions: S,
    pub clock: C,
}

impl<U, V, S, C> VerifyOtpUseCase<U, V, S, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
    C: Clock,
{
    /// Consume a signup code, flip the account to verified and open the first
    /// session in one step.
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<(User, String), ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // Checked before touching codes: re-verifying is a client error even
        // when a stale code happens to still be lying around.
        if user.is_verified {
            return Err(ApiError::AlreadyVerified);
        }

        otp::validate_code(&self.codes, &self.clock, user_id, code, CodePurpose::Signup).await?;

        let now = self.clock.now();
        self.users.mark_verified(user_id, now).await?;

        let session_token = mint_session(&self.sessions, &self.clock, user_id).await?;
        let user = User {
            is_verified: true,
            updated_at: now,
            ..user
        };
        Ok((user, session_token))
    }
}

pub struct ResendOtpUseCase<U, V, D, C>
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

impl<U, V, D, C> ResendOtpUseCase<U, V, D, C>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    D: DeliveryChannel,
    C: Clock,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if user.is_verified {
            return Err(ApiError::AlreadyVerified);
        }

        otp::issue_code(
            &self.codes,
            &self.delivery,
            &self.clock,
            user.id,
            user.contact_target(),
            CodePurpose::Signup,
            self.fixed_codes,
        )
        .await?;
        Ok(())
    }
}

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Idempotent: logging out an unknown or already-deleted token succeeds.
    pub async fn execute(&self, token: &str) -> Result<(), ApiError> {
        self.sessions.delete_by_token(token).await
    }
}

async fn mint_session<S, C>(sessions: &S, clock: &C, user_id: Uuid) -> Result<String, ApiError>
where
    S: SessionRepository,
    C: Clock,
{
    let token = super::token::new_session_token();
    let now = clock.now();
    sessions
        .create(&Session {
            id: Uuid::new_v4(),
            user_id,
            token: token.clone(),
            expires_at: now + Duration::seconds(SESSION_EXP as i64),
            created_at: now,
        })
        .await?;
    Ok(token)
}
