use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use trenzo_api::domain::repository::{
    AddressRepository, AdminSessionRepository, Clock, DeliveryChannel, SessionRepository,
    UserRepository, VerificationCodeRepository,
};
use trenzo_api::domain::types::{
    Address, AddressChanges, AdminSession, CodePurpose, ProfileChanges, Session, User,
    VerificationCode,
};
use trenzo_api::error::ApiError;
use trenzo_api::security;
use trenzo_auth_types::role::Role;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "hunter2!";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
}

pub fn test_user(verified: bool) -> User {
    User {
        id: Uuid::new_v4(),
        email: "asha@example.com".into(),
        phone: Some("971500000001".into()),
        full_name: "Asha Nair".into(),
        password_hash: security::hash_password(TEST_PASSWORD).unwrap(),
        role: Role::User,
        is_verified: verified,
        image_url: None,
        created_at: t0(),
        updated_at: t0(),
    }
}

pub fn test_admin() -> User {
    User {
        id: Uuid::new_v4(),
        email: "admin@example.com".into(),
        phone: Some("971500000009".into()),
        full_name: "Root Admin".into(),
        password_hash: security::hash_password(TEST_PASSWORD).unwrap(),
        role: Role::Admin,
        is_verified: true,
        image_url: None,
        created_at: t0(),
        updated_at: t0(),
    }
}

// ── ManualClock ──────────────────────────────────────────────────────────────

/// Controllable clock shared across usecases under test.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == identifier || u.phone.as_deref() == Some(identifier))
            .cloned())
    }

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email || (phone.is_some() && u.phone.as_deref() == phone))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == user.email || (user.phone.is_some() && u.phone == user.phone))
        {
            return Err(ApiError::DuplicateIdentity);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        user.is_verified = true;
        user.updated_at = at;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(full_name) = &changes.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(image_url) = &changes.image_url {
            user.image_url = Some(image_url.clone());
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        user.updated_at = at;
        Ok(())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(full_name) = full_name {
            user.full_name = full_name.to_owned();
        }
        if let Some(phone) = phone {
            user.phone = Some(phone.to_owned());
        }
        user.updated_at = at;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<VerificationCode>>>,
}

impl VerificationCodeRepository for MockCodeRepo {
    async fn delete_unused(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), ApiError> {
        self.codes
            .lock()
            .unwrap()
            .retain(|c| !(c.user_id == user_id && c.purpose == purpose && c.used_at.is_none()));
        Ok(())
    }

    async fn create(&self, code: &VerificationCode) -> Result<(), ApiError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_unused(
        &self,
        user_id: Uuid,
        code: &str,
        purpose: CodePurpose,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, ApiError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.user_id == user_id
                    && c.code == code
                    && c.purpose == purpose
                    && c.used_at.is_none()
                    && c.expires_at > cutoff
            })
            .cloned())
    }

    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError> {
        let mut codes = self.codes.lock().unwrap();
        match codes.iter_mut().find(|c| c.id == id && c.used_at.is_none()) {
            Some(c) => {
                c.used_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockSessionRepo / MockAdminSessionRepo ───────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), ApiError> {
        self.sessions.lock().unwrap().retain(|s| s.token != token);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockAdminSessionRepo {
    pub sessions: Arc<Mutex<Vec<AdminSession>>>,
}

impl AdminSessionRepository for MockAdminSessionRepo {
    async fn create(&self, session: &AdminSession) -> Result<(), ApiError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<AdminSession>, ApiError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.refresh_token == refresh_token)
            .cloned())
    }

    async fn delete_by_token(&self, refresh_token: &str) -> Result<(), ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.refresh_token != refresh_token);
        Ok(())
    }
}

// ── MockAddressRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAddressRepo {
    pub rows: Arc<Mutex<Vec<Address>>>,
}

impl AddressRepository for MockAddressRepo {
    async fn create(&self, address: &Address) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if address.is_default {
            for row in rows.iter_mut().filter(|a| a.user_id == address.user_id) {
                row.is_default = false;
            }
        }
        rows.push(address.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, ApiError> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &AddressChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Address>, ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if changes.is_default == Some(true) {
            for row in rows.iter_mut().filter(|a| a.user_id == user_id) {
                row.is_default = false;
            }
        }
        let Some(row) = rows.iter_mut().find(|a| a.id == id && a.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            row.title = title.clone();
        }
        if let Some(address) = &changes.address {
            row.address = address.clone();
        }
        if let Some(phone) = &changes.phone {
            row.phone = phone.clone();
        }
        if let Some(is_default) = changes.is_default {
            row.is_default = is_default;
        }
        row.updated_at = at;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rows.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

// ── Delivery channels ────────────────────────────────────────────────────────

/// Records every send without talking to a gateway.
#[derive(Clone, Default)]
pub struct RecordingDelivery {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl DeliveryChannel for RecordingDelivery {
    async fn send(&self, target: &str, message: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((target.to_owned(), message.to_owned()));
        Ok(())
    }
}
