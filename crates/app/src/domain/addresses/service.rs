//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::NewAddress,
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid},
            repository::PgAddressesRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let addresses = self.repository.list_addresses(&mut tx, user).await?;

        tx.commit().await?;

        Ok(addresses)
    }

    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self
            .repository
            .find_address(&mut tx, user, address)
            .await?
            .ok_or(AddressesServiceError::NotFound)?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let required = [
            &address.recipient,
            &address.phone,
            &address.line1,
            &address.city,
            &address.state,
            &address.postal_code,
            &address.country,
        ];

        if required.into_iter().any(|value| is_blank(value)) {
            return Err(AddressesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_address(&mut tx, user, address).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_address(&mut tx, user, address).await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Lists the user's live addresses, oldest first.
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError>;

    /// Retrieve one of the user's addresses.
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Adds an address to the user's address book.
    async fn create_address(
        &self,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Soft-deletes one of the user's addresses.
    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}
