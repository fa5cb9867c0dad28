//! Address book, scoped to the owning user's session.

use uuid::Uuid;

use crate::domain::repository::{AddressRepository, Clock};
use crate::domain::types::{Address, AddressChanges};
use crate::error::ApiError;

#[derive(Debug)]
pub struct AddAddressInput {
    pub title: String,
    pub address: String,
    pub phone: String,
    pub is_default: bool,
}

pub struct AddAddressUseCase<A, C>
where
    A: AddressRepository,
    C: Clock,
{
    pub addresses: A,
    pub clock: C,
}

impl<A, C> AddAddressUseCase<A, C>
where
    A: AddressRepository,
    C: Clock,
{
    /// The store guarantees at most one default per user by clearing the flag
    /// on siblings inside the same transaction.
    pub async fn execute(&self, user_id: Uuid, input: AddAddressInput) -> Result<Address, ApiError> {
        let now = self.clock.now();
        let address = Address {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            address: input.address,
            phone: input.phone,
            is_default: input.is_default,
            created_at: now,
            updated_at: now,
        };
        self.addresses.create(&address).await?;
        Ok(address)
    }
}

pub struct ListAddressesUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> ListAddressesUseCase<A> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Address>, ApiError> {
        self.addresses.list_by_user(user_id).await
    }
}

pub struct UpdateAddressUseCase<A, C>
where
    A: AddressRepository,
    C: Clock,
{
    pub addresses: A,
    pub clock: C,
}

impl<A, C> UpdateAddressUseCase<A, C>
where
    A: AddressRepository,
    C: Clock,
{
    /// Ownership is enforced inside the store update; an id belonging to
    /// another user reads as absent.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: AddressChanges,
    ) -> Result<Address, ApiError> {
        self.addresses
            .update(user_id, id, &changes, self.clock.now())
            .await?
            .ok_or(ApiError::AddressNotFound)
    }
}

pub struct DeleteAddressUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> DeleteAddressUseCase<A> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let found = self
            .addresses
            .find_by_id(id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or(ApiError::AddressNotFound)?;
        self.addresses.delete(found.id).await
    }
}
