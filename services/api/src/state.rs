use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::infra::clock::SystemClock;
use crate::infra::db::{
    DbAddressRepository, DbAdminSessionRepository, DbSessionRepository, DbUserRepository,
    DbVerificationCodeRepository,
};
use crate::infra::files::LocalFileStore;
use crate::infra::metal::MetalPriceClient;
use crate::infra::sms::SmsClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub sms_api_url: String,
    pub sms_api_key: String,
    pub sms_sender_id: String,
    pub metal_api_url: String,
    pub metal_api_key: String,
    pub upload_dir: PathBuf,
    pub otp_fixed_codes: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn admin_session_repo(&self) -> DbAdminSessionRepository {
        DbAdminSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn address_repo(&self) -> DbAddressRepository {
        DbAddressRepository {
            db: self.db.clone(),
        }
    }

    pub fn delivery(&self) -> SmsClient {
        SmsClient {
            http: self.http.clone(),
            api_url: self.sms_api_url.clone(),
            api_key: self.sms_api_key.clone(),
            sender_id: self.sms_sender_id.clone(),
        }
    }

    pub fn metal_source(&self) -> MetalPriceClient {
        MetalPriceClient {
            http: self.http.clone(),
            api_url: self.metal_api_url.clone(),
            api_key: self.metal_api_key.clone(),
        }
    }

    pub fn file_store(&self) -> LocalFileStore {
        LocalFileStore {
            root: self.upload_dir.clone(),
        }
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
