#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    Address, AddressChanges, AdminSession, CodePurpose, MetalRates, ProfileChanges, Session, User,
    VerificationCode,
};
use crate::error::ApiError;

/// Repository for user identity records.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Look up by email or phone equality — the login identifier matches either.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError>;

    /// Duplicate check for registration: one query over both unique fields.
    /// The phone arm is skipped when no phone was supplied.
    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>, ApiError>;

    /// Insert a new user. Unique-constraint violations surface as
    /// [`ApiError::DuplicateIdentity`].
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Flip the verified flag. One-way: a verified user never reverts.
    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError>;

    /// Admin-side update of name and phone.
    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError>;

    /// All users, newest first.
    async fn list_all(&self) -> Result<Vec<User>, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Repository for one-time verification codes.
pub trait VerificationCodeRepository: Send + Sync {
    /// Drop all unused codes for (user, purpose) — run before issuing so at
    /// most one live code exists per scope.
    async fn delete_unused(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), ApiError>;

    async fn create(&self, code: &VerificationCode) -> Result<(), ApiError>;

    /// Find an unused code matching (user, code, purpose) with
    /// `expires_at > cutoff`. The cutoff already folds in any grace window.
    async fn find_unused(
        &self,
        user_id: Uuid,
        code: &str,
        purpose: CodePurpose,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, ApiError>;

    /// Set `used_at` if and only if it is still null — a compare-and-swap.
    /// Returns `true` when this call consumed the code; a concurrent second
    /// validation observes `false`.
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError>;
}

/// Repository for opaque user sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), ApiError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError>;

    /// Idempotent: deleting an unknown token is not an error.
    async fn delete_by_token(&self, token: &str) -> Result<(), ApiError>;
}

/// Repository for admin refresh-token records.
pub trait AdminSessionRepository: Send + Sync {
    async fn create(&self, session: &AdminSession) -> Result<(), ApiError>;

    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<AdminSession>, ApiError>;

    /// Idempotent: deleting an unknown token is not an error.
    async fn delete_by_token(&self, refresh_token: &str) -> Result<(), ApiError>;
}

/// Repository for delivery addresses.
pub trait AddressRepository: Send + Sync {
    /// Insert an address. When `is_default` is set, the previous default is
    /// unset in the same transaction.
    async fn create(&self, address: &Address) -> Result<(), ApiError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, ApiError>;

    /// Update an address owned by `user_id`. Default-flag changes run in the
    /// same unset-then-set transaction as create. Returns `None` when no such
    /// address belongs to the user.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &AddressChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Address>, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Outbound delivery channel (SMS gateway). Fire-and-forget from the
/// orchestrators' perspective: failures are logged and swallowed upstream.
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, target: &str, message: &str) -> anyhow::Result<()>;
}

/// Wall-clock source. All expiry math goes through this so tests can
/// substitute a controllable clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Stored-file handle used for best-effort cleanup of replaced profile images.
pub trait FileStore: Send + Sync {
    async fn remove(&self, reference: &str) -> anyhow::Result<()>;
}

/// Upstream metal-price quote source.
pub trait MetalPriceSource: Send + Sync {
    async fn latest_rates(&self) -> Result<MetalRates, ApiError>;
}
