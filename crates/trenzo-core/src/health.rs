use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`. The api service is ready as soon as it is
/// serving; there is no warm-up phase to gate on.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
