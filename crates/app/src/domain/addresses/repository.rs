//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    addresses::{
        data::NewAddress,
        records::{AddressRecord, AddressUuid},
    },
    users::records::UserUuid,
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(LIST_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch an address only when it belongs to `user` and is not deleted.
    pub(crate) async fn find_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: NewAddress,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(CREATE_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(address.recipient)
            .bind(address.phone)
            .bind(address.line1)
            .bind(address.line2)
            .bind(address.city)
            .bind(address.state)
            .bind(address.postal_code)
            .bind(address.country)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            recipient: row.try_get("recipient")?,
            phone: row.try_get("phone")?,
            line1: row.try_get("line1")?,
            line2: row.try_get("line2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
