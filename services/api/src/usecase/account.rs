//! Admin-side user administration.

use uuid::Uuid;

use crate::domain::repository::{Clock, UserRepository};
use crate::domain::types::User;
use crate::error::ApiError;

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.users.list_all().await
    }
}

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: Uuid) -> Result<User, ApiError> {
        self.users.find_by_id(id).await?.ok_or(ApiError::UserNotFound)
    }
}

#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateUserUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    pub users: U,
    pub clock: C,
}

impl<U, C> UpdateUserUseCase<U, C>
where
    U: UserRepository,
    C: Clock,
{
    /// Admins may touch name and phone only. Email, role and verification
    /// state are out of reach here.
    pub async fn execute(&self, id: Uuid, input: UpdateUserInput) -> Result<User, ApiError> {
        if input.full_name.is_some() || input.phone.is_some() {
            self.users
                .update_contact(
                    id,
                    input.full_name.as_deref(),
                    input.phone.as_deref(),
                    self.clock.now(),
                )
                .await?;
        }
        self.users.find_by_id(id).await?.ok_or(ApiError::UserNotFound)
    }
}

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    /// Cascades to sessions, codes and addresses at the store level.
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        self.users.delete(id).await
    }
}
