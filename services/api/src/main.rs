use sea_orm::Database;
use tracing::info;

use trenzo_api::config::ApiConfig;
use trenzo_api::router::build_router;
use trenzo_api::state::AppState;
use trenzo_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::new();

    let state = AppState {
        db,
        http,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        sms_api_url: config.sms_api_url,
        sms_api_key: config.sms_api_key,
        sms_sender_id: config.sms_sender_id,
        metal_api_url: config.metal_api_url,
        metal_api_key: config.metal_api_key,
        upload_dir: config.upload_dir.into(),
        otp_fixed_codes: config.otp_fixed_codes,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
