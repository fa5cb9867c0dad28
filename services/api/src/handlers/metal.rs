//! Public metal price endpoint.

use std::collections::BTreeMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::metal::GetMetalPricesUseCase;

#[derive(Serialize)]
pub struct QuoteResponse {
    pub weight: &'static str,
    /// AED, two decimals.
    pub price: f64,
}

// ── GET /metals/prices ────────────────────────────────────────────────────────

pub async fn prices(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetMetalPricesUseCase {
        source: state.metal_source(),
    };

    let quotes = usecase.execute().await?;
    let body: BTreeMap<&'static str, QuoteResponse> = quotes
        .into_iter()
        .map(|q| {
            (
                q.name,
                QuoteResponse {
                    weight: q.weight,
                    price: q.price,
                },
            )
        })
        .collect();
    Ok(Json(body))
}
