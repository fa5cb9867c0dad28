//! User-facing auth endpoints: registration, login, OTP verification, session
//! logout and self-service profile.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trenzo_auth_types::cookie::{TRENZO_SESSION, clear_session_cookie, set_session_cookie};

use crate::error::ApiError;
use crate::extract::{SessionIdentity, bearer_token};
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{
    LoginOutput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase, ResendOtpUseCase,
    VerifyOtpUseCase,
};
use crate::usecase::profile::{GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase};

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    /// False when the account exists but the verification code could not be
    /// issued; the client should offer a resend.
    pub code_issued: bool,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        delivery: state.delivery(),
        clock: state.clock(),
        fixed_codes: state.otp_fixed_codes,
    };

    let out = usecase
        .execute(RegisterInput {
            full_name: body.full_name,
            email: body.email,
            phone: body.phone,
            password: body.password,
        })
        .await?;

    let body = RegisterResponse {
        user: out.user.into(),
        code_issued: out.code_issued,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Email or phone number.
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    PendingVerification { user_id: Uuid },
    Authenticated { user: UserResponse },
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        sessions: state.session_repo(),
        delivery: state.delivery(),
        clock: state.clock(),
        fixed_codes: state.otp_fixed_codes,
    };

    match usecase.execute(&body.identifier, &body.password).await? {
        LoginOutput::PendingVerification { user } => {
            let body = LoginResponse::PendingVerification { user_id: user.id };
            Ok((StatusCode::OK, jar, Json(body)))
        }
        LoginOutput::Authenticated {
            user,
            session_token,
        } => {
            let jar = set_session_cookie(jar, session_token, state.cookie_domain.clone());
            let body = LoginResponse::Authenticated { user: user.into() };
            Ok((StatusCode::OK, jar, Json(body)))
        }
    }
}

// ── POST /auth/verify-otp ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub user_id: Uuid,
    pub code: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        sessions: state.session_repo(),
        clock: state.clock(),
    };

    let (user, session_token) = usecase.execute(body.user_id, &body.code).await?;
    let jar = set_session_cookie(jar, session_token, state.cookie_domain.clone());
    Ok((StatusCode::OK, jar, Json(UserResponse::from(user))))
}

// ── POST /auth/resend-otp ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub user_id: Uuid,
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ResendOtpUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        delivery: state.delivery(),
        clock: state.clock(),
        fixed_codes: state.otp_fixed_codes,
    };

    usecase.execute(body.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    // No identity gate: logout with a dead or absent session still clears the
    // cookie and succeeds. Bearer clients revoke through the same fallback
    // the session gate accepts.
    let token = jar
        .get(TRENZO_SESSION)
        .map(|c| c.value().to_owned())
        .or_else(|| bearer_token(&headers));
    if let Some(token) = token {
        let usecase = LogoutUseCase {
            sessions: state.session_repo(),
        };
        usecase.execute(&token).await?;
    }

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}

// ── GET /auth/profile ─────────────────────────────────────────────────────────

pub async fn get_profile(
    State(state): State<AppState>,
    identity: SessionIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

// ── PATCH /auth/profile ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
        files: state.file_store(),
        clock: state.clock(),
    };

    let user = usecase
        .execute(
            identity.user.id,
            UpdateProfileInput {
                full_name: body.full_name,
                image_url: body.image_url,
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(user)))
}
