use chrono::{DateTime, Duration, Utc};
use trenzo_auth_types::role::Role;
use uuid::Uuid;

/// One-time code time-to-live in minutes.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Grace window past nominal expiry for admin-purpose validation, absorbing
/// clock drift between the issuing and validating processes. Not applied to
/// the signup purpose.
pub const ADMIN_OTP_GRACE_SECS: i64 = 30;

/// Random bytes in a user session token (hex-encoded to 96 chars).
pub const SESSION_TOKEN_BYTES: usize = 48;

/// Random bytes in an admin refresh token (hex-encoded to 80 chars).
pub const REFRESH_TOKEN_BYTES: usize = 40;

/// Fixed codes substituted for random ones when the config enables
/// deterministic codes (end-to-end test reproducibility).
pub const SIGNUP_SENTINEL_CODE: &str = "000000";
pub const ADMIN_SENTINEL_CODE: &str = "999999";

/// What a verification code proves. Stored as its wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Signup,
    AdminAction,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::Signup => "SIGNUP",
            CodePurpose::AdminAction => "ADMIN_ACTION",
        }
    }

    /// Fixed code used instead of a random one in deterministic mode.
    pub fn sentinel(&self) -> &'static str {
        match self {
            CodePurpose::Signup => SIGNUP_SENTINEL_CODE,
            CodePurpose::AdminAction => ADMIN_SENTINEL_CODE,
        }
    }

    /// How far past nominal expiry a code of this purpose still validates.
    pub fn expiry_grace(&self) -> Duration {
        match self {
            CodePurpose::Signup => Duration::zero(),
            CodePurpose::AdminAction => Duration::seconds(ADMIN_OTP_GRACE_SECS),
        }
    }
}

/// User identity record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Delivery target for codes: phone when present, email otherwise.
    pub fn contact_target(&self) -> &str {
        self.phone.as_deref().unwrap_or(&self.email)
    }
}

/// Single-use verification code scoped to (user, purpose).
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub target: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Opaque user session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Admin refresh-token record, rotated on every refresh.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Delivery address owned by a user.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub address: String,
    pub phone: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.image_url.is_none() && self.password_hash.is_none()
    }
}

/// Partial address update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AddressChanges {
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

/// Upstream AED-base rates: metal per 1 AED, quoted per troy ounce.
#[derive(Debug, Clone, Copy)]
pub struct MetalRates {
    pub xau: f64,
    pub xag: f64,
}
