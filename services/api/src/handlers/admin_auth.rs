//! Admin auth endpoints: password step, 2FA step, refresh and logout.
//!
//! The refresh token travels only as an HttpOnly cookie scoped to
//! `/admin/auth`; the access token travels in the response body and comes
//! back as a bearer header.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trenzo_auth_types::cookie::{
    TRENZO_REFRESH_TOKEN, clear_refresh_token_cookie, set_refresh_token_cookie,
};
use trenzo_auth_types::role::Role;

use crate::error::ApiError;
use crate::extract::{AccessIdentity, bearer_token};
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::admin_auth::{
    AdminLogoutUseCase, InitiateAdminLoginUseCase, RefreshAdminSessionUseCase,
    VerifyAdmin2faUseCase,
};
use crate::usecase::profile::GetProfileUseCase;

// ── POST /admin/auth/login ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub status: &'static str,
    /// Echoed back in the 2FA request.
    pub user_id: Uuid,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = InitiateAdminLoginUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        delivery: state.delivery(),
        clock: state.clock(),
        fixed_codes: state.otp_fixed_codes,
    };

    let user_id = usecase.execute(&body.identifier, &body.password).await?;
    let body = AdminLoginResponse {
        status: "pending_2fa",
        user_id,
    };
    Ok(Json(body))
}

// ── POST /admin/auth/verify-2fa ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct Verify2faRequest {
    pub user_id: Uuid,
    pub code: String,
}

#[derive(Serialize)]
pub struct AdminTokenResponse {
    pub access_token: String,
    pub access_token_exp: u64,
    pub user: UserResponse,
}

pub async fn verify_2fa(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<Verify2faRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = VerifyAdmin2faUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        admin_sessions: state.admin_session_repo(),
        clock: state.clock(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(body.user_id, &body.code).await?;
    let jar = set_refresh_token_cookie(jar, out.pair.refresh_token, state.cookie_domain.clone());
    let body = AdminTokenResponse {
        access_token: out.pair.access_token,
        access_token_exp: out.pair.access_token_exp,
        user: out.user.into(),
    };
    Ok((StatusCode::OK, jar, Json(body)))
}

// ── POST /admin/auth/refresh ──────────────────────────────────────────────────

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_value = jar
        .get(TRENZO_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(ApiError::SessionExpired)?;

    let usecase = RefreshAdminSessionUseCase::new(
        state.user_repo(),
        state.admin_session_repo(),
        state.clock(),
        state.jwt_secret.clone(),
    );

    let out = usecase.execute(&refresh_value).await?;
    let jar = set_refresh_token_cookie(jar, out.pair.refresh_token, state.cookie_domain.clone());
    let body = AdminTokenResponse {
        access_token: out.pair.access_token,
        access_token_exp: out.pair.access_token_exp,
        user: out.user.into(),
    };
    Ok((StatusCode::OK, jar, Json(body)))
}

// ── POST /admin/auth/logout ───────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    // Cookie first, bearer fallback, so non-browser clients can revoke too.
    let token = jar
        .get(TRENZO_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .or_else(|| bearer_token(&headers));
    if let Some(token) = token {
        let usecase = AdminLogoutUseCase {
            admin_sessions: state.admin_session_repo(),
        };
        usecase.execute(&token).await?;
    }

    let jar = clear_refresh_token_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}

// ── GET /admin/auth/profile ───────────────────────────────────────────────────

pub async fn profile(
    State(state): State<AppState>,
    identity: AccessIdentity,
) -> Result<impl IntoResponse, ApiError> {
    identity.require_role(Role::Admin)?;

    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.0.user_id).await?;
    Ok(Json(UserResponse::from(user)))
}
