use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use trenzo_core::health::{healthz, readyz};
use trenzo_core::middleware::request_id_layer;

use crate::handlers::{
    address::{add_address, delete_address, list_addresses, update_address},
    admin_auth,
    auth::{get_profile, login, logout, register, resend_otp, update_profile, verify_otp},
    metal,
    user::{delete_user, get_user, list_users, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // User auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(get_profile))
        .route("/auth/profile", patch(update_profile))
        // Admin auth
        .route("/admin/auth/login", post(admin_auth::login))
        .route("/admin/auth/verify-2fa", post(admin_auth::verify_2fa))
        .route("/admin/auth/refresh", post(admin_auth::refresh))
        .route("/admin/auth/logout", post(admin_auth::logout))
        .route("/admin/auth/profile", get(admin_auth::profile))
        // Address book (session-gated; the static `addresses` segment wins
        // over the admin-gated `/users/{id}` param routes)
        .route("/users/addresses", post(add_address))
        .route("/users/addresses", get(list_addresses))
        .route("/users/addresses/{id}", patch(update_address))
        .route("/users/addresses/{id}", delete(delete_address))
        // User administration
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", patch(update_user))
        .route("/users/{id}", delete(delete_user))
        // Metal prices
        .route("/metals/prices", get(metal::prices))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
