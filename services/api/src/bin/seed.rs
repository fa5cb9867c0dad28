//! Seed the admin account. Idempotent: an existing account with the same
//! email is left untouched.
//!
//! Env: `DATABASE_URL`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`, optionally
//! `ADMIN_NAME` and `ADMIN_PHONE`.

use chrono::Utc;
use sea_orm::Database;
use tracing::info;
use uuid::Uuid;

use trenzo_api::domain::repository::UserRepository as _;
use trenzo_api::domain::types::User;
use trenzo_api::infra::db::DbUserRepository;
use trenzo_api::security;
use trenzo_auth_types::role::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trenzo_core::tracing::init_tracing();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD");
    let full_name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_owned());
    let phone = std::env::var("ADMIN_PHONE").ok();

    let db = Database::connect(&database_url).await?;
    let users = DbUserRepository { db };

    if users.find_by_identifier(&email).await?.is_some() {
        info!("admin account {email} already exists, nothing to do");
        return Ok(());
    }

    let now = Utc::now();
    let admin = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        phone,
        full_name,
        password_hash: security::hash_password(&password)?,
        role: Role::Admin,
        // Seeded admins skip the OTP signup flow.
        is_verified: true,
        image_url: None,
        created_at: now,
        updated_at: now,
    };
    users.create(&admin).await?;

    info!("admin account {email} created");
    Ok(())
}
