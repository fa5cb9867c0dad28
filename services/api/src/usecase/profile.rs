//! Self-service profile reads and updates for session-holding users.

use uuid::Uuid;

use crate::domain::repository::{Clock, FileStore, UserRepository};
use crate::domain::types::{ProfileChanges, User};
use crate::error::ApiError;
use crate::security;

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub image_url: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdateProfileUseCase<U, F, C>
where
    U: UserRepository,
    F: FileStore,
    C: Clock,
{
    pub users: U,
    pub files: F,
    pub clock: C,
}

impl<U, F, C> UpdateProfileUseCase<U, F, C>
where
    U: UserRepository,
    F: FileStore,
    C: Clock,
{
    /// Apply a partial update. A password change requires re-proving the
    /// current password; replacing the avatar removes the previous file on a
    /// best-effort basis.
    pub async fn execute(&self, user_id: Uuid, input: UpdateProfileInput) -> Result<User, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let mut changes = ProfileChanges {
            full_name: input.full_name,
            ..Default::default()
        };

        if let Some(new_password) = input.new_password {
            let current = input.current_password.as_deref().unwrap_or_default();
            if !security::verify_password(current, &user.password_hash) {
                return Err(ApiError::IncorrectPassword);
            }
            changes.password_hash = Some(security::hash_password(&new_password)?);
        }

        if let Some(image_url) = input.image_url {
            if let Some(old) = &user.image_url {
                if *old != image_url {
                    // Orphaned file cleanup must never fail the update.
                    if let Err(e) = self.files.remove(old).await {
                        tracing::warn!(user_id = %user_id, "stale avatar removal failed: {e}");
                    }
                }
            }
            changes.image_url = Some(image_url);
        }

        if !changes.is_empty() {
            self.users
                .update_profile(user_id, &changes, self.clock.now())
                .await?;
        }

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
