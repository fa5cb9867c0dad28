//! Admin-gated user administration endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trenzo_auth_types::role::Role;
use trenzo_core::serde::to_rfc3339_ms;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::AccessIdentity;
use crate::state::AppState;
use crate::usecase::account::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateUserInput, UpdateUserUseCase,
};

/// Public user shape. The password hash never appears here.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub is_verified: bool,
    pub image_url: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            full_name: user.full_name,
            role: user.role,
            is_verified: user.is_verified,
            image_url: user.image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /users ────────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    identity: AccessIdentity,
) -> Result<impl IntoResponse, ApiError> {
    identity.require_role(Role::Admin)?;

    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute().await?;
    let body: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

// ── GET /users/{id} ───────────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    identity: AccessIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    identity.require_role(Role::Admin)?;

    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(id).await?;
    Ok(Json(UserResponse::from(user)))
}

// ── PATCH /users/{id} ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_user(
    State(state): State<AppState>,
    identity: AccessIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    identity.require_role(Role::Admin)?;

    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        clock: state.clock(),
    };
    let user = usecase
        .execute(
            id,
            UpdateUserInput {
                full_name: body.full_name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(user)))
}

// ── DELETE /users/{id} ────────────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    identity: AccessIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    identity.require_role(Role::Admin)?;

    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
