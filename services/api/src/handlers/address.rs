//! Address book endpoints, gated by the owner's session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trenzo_core::serde::to_rfc3339_ms;

use crate::domain::types::{Address, AddressChanges};
use crate::error::ApiError;
use crate::extract::SessionIdentity;
use crate::state::AppState;
use crate::usecase::address::{
    AddAddressInput, AddAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase,
    UpdateAddressUseCase,
};

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: Uuid,
    pub title: String,
    pub address: String,
    pub phone: String,
    pub is_default: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            title: address.title,
            address: address.address,
            phone: address.phone,
            is_default: address.is_default,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

// ── POST /users/addresses ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddAddressRequest {
    pub title: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

pub async fn add_address(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Json(body): Json<AddAddressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = AddAddressUseCase {
        addresses: state.address_repo(),
        clock: state.clock(),
    };

    let address = usecase
        .execute(
            identity.user.id,
            AddAddressInput {
                title: body.title,
                address: body.address,
                phone: body.phone,
                is_default: body.is_default,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AddressResponse::from(address))))
}

// ── GET /users/addresses ──────────────────────────────────────────────────────

pub async fn list_addresses(
    State(state): State<AppState>,
    identity: SessionIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ListAddressesUseCase {
        addresses: state.address_repo(),
    };
    let addresses = usecase.execute(identity.user.id).await?;
    let body: Vec<AddressResponse> = addresses.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

// ── PATCH /users/addresses/{id} ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAddressRequest {
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

pub async fn update_address(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAddressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = UpdateAddressUseCase {
        addresses: state.address_repo(),
        clock: state.clock(),
    };

    let address = usecase
        .execute(
            identity.user.id,
            id,
            AddressChanges {
                title: body.title,
                address: body.address,
                phone: body.phone,
                is_default: body.is_default,
            },
        )
        .await?;
    Ok(Json(AddressResponse::from(address)))
}

// ── DELETE /users/addresses/{id} ──────────────────────────────────────────────

pub async fn delete_address(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DeleteAddressUseCase {
        addresses: state.address_repo(),
    };
    usecase.execute(identity.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
